//! TDX data HTTP client.
//!
//! Provides authenticated reads of the live train board and the station
//! directory. Every request first asks the [`CredentialManager`] for a
//! bearer token.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::pipeline::TransitSource;

use super::auth::{CredentialManager, HttpTokenExchange, TokenExchange};
use super::error::{FetchError, Resource, body_snippet};
use super::types::{LiveBoardResponse, LiveTrainRecord, StationRecord, StationResponse};

/// Default live board URL (first 100 trains).
const DEFAULT_LIVE_BOARD_URL: &str =
    "https://tdx.transportdata.tw/api/basic/v3/Rail/TRA/TrainLiveBoard?%24top=100&%24format=JSON";

/// Default station directory URL.
const DEFAULT_STATION_URL: &str =
    "https://tdx.transportdata.tw/api/basic/v3/Rail/TRA/Station?%24format=JSON";

/// Configuration for the TDX data client.
#[derive(Debug, Clone)]
pub struct TdxConfig {
    /// Full URL of the live board endpoint
    pub live_board_url: String,
    /// Full URL of the station directory endpoint
    pub station_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TdxConfig {
    pub fn new() -> Self {
        Self {
            live_board_url: DEFAULT_LIVE_BOARD_URL.to_string(),
            station_url: DEFAULT_STATION_URL.to_string(),
            timeout_secs: 20,
        }
    }

    /// Set a custom live board URL (for testing).
    pub fn with_live_board_url(mut self, url: impl Into<String>) -> Self {
        self.live_board_url = url.into();
        self
    }

    /// Set a custom station directory URL (for testing).
    pub fn with_station_url(mut self, url: impl Into<String>) -> Self {
        self.station_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for TdxConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// TDX Rail/TRA API client.
pub struct TdxClient<E = HttpTokenExchange> {
    http: reqwest::Client,
    live_board_url: String,
    station_url: String,
    credentials: Arc<CredentialManager<E>>,
}

impl<E: TokenExchange + Sync> TdxClient<E> {
    /// Create a new client that authenticates through `credentials`.
    pub fn new(
        config: TdxConfig,
        credentials: Arc<CredentialManager<E>>,
    ) -> Result<Self, FetchError> {
        // gzip is negotiated through Accept-Encoding by the client itself
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(FetchError::Setup)?;

        Ok(Self {
            http,
            live_board_url: config.live_board_url,
            station_url: config.station_url,
            credentials,
        })
    }

    /// The credential manager shared by this client.
    pub fn credentials(&self) -> &Arc<CredentialManager<E>> {
        &self.credentials
    }

    /// GET `url` with a bearer token and decode the body as `T`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: Resource,
        url: &str,
    ) -> Result<T, FetchError> {
        let token = self.credentials.get_token().await?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|source| FetchError::Http { resource, source })?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            // The token was revoked or expired early; start over next time.
            self.credentials.invalidate().await;
            return Err(FetchError::Unauthorized { resource });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                resource,
                status: status.as_u16(),
                message: body_snippet(&body),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Http { resource, source })?;

        serde_json::from_str(&body).map_err(|e| FetchError::Json {
            resource,
            message: e.to_string(),
            body: Some(body_snippet(&body)),
        })
    }
}

impl<E: TokenExchange + Send + Sync> TransitSource for TdxClient<E> {
    async fn fetch_live_trains(&self) -> Result<Vec<LiveTrainRecord>, FetchError> {
        let response: LiveBoardResponse = self
            .get_json(Resource::LiveBoard, &self.live_board_url)
            .await?;
        Ok(response.train_live_boards)
    }

    async fn fetch_stations(&self) -> Result<Vec<StationRecord>, FetchError> {
        let response: StationResponse = self.get_json(Resource::Stations, &self.station_url).await?;
        Ok(response.stations)
    }
}
