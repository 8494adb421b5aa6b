//! TDX (Transport Data eXchange) client.
//!
//! This module provides the HTTP side of the map: a client-credentials token
//! exchange with caching, and authenticated reads of the Taiwan Railway live
//! train board and station directory.
//!
//! Key characteristics of TDX:
//! - Tokens come from an OpenID Connect `client_credentials` grant and are
//!   sent as `Authorization: Bearer <token>`
//! - Field names are PascalCase (`StationID`, `TrainNo`, `DelayTime`)
//! - Station names are locale-keyed objects (`Zh_tw`, `En`)

mod auth;
mod client;
mod error;
mod types;


pub use auth::{
    AuthConfig, ClientCredentials, CredentialManager, HttpTokenExchange, MAX_EXPIRES_IN_SECS,
    TokenExchange, TokenGrant,
};
pub use client::{TdxClient, TdxConfig};
pub use error::{AuthError, FetchError, Resource};
pub use types::{LiveBoardResponse, LiveTrainRecord, StationRecord, StationResponse, TokenResponse};
