//! Live train map server for Taiwan Railway.
//!
//! Polls the TDX live train board and station directory, places each
//! reported train at its station, and serves the result as a Leaflet map
//! that the host page reloads on a timer.

pub mod config;
pub mod domain;
pub mod map;
pub mod pipeline;
pub mod refresh;
pub mod tdx;
pub mod web;
