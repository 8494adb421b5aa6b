//! Process configuration from environment variables.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::domain::{DEFAULT_NAME_LOCALE, is_latitude, is_longitude};
use crate::map::MapConfig;
use crate::tdx::{AuthConfig, ClientCredentials, MAX_EXPIRES_IN_SECS, TdxConfig};

/// Default refresh period (2 minutes).
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 120;

/// Default per-request timeout.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;

/// Default margin before token expiry.
const DEFAULT_TOKEN_SAFETY_MARGIN_SECS: i64 = 60;

/// Default listen address (loopback only).
const DEFAULT_LISTEN_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 3000);

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: ClientCredentials,
    pub auth: AuthConfig,
    pub tdx: TdxConfig,
    pub map: MapConfig,
    /// Station name locales, most preferred first.
    pub name_locales: Vec<String>,
    pub token_safety_margin_secs: i64,
    pub refresh_interval: Duration,
    pub listen_addr: SocketAddr,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// Missing credentials are only warned about: the server still starts
    /// and every cycle shows the resulting authentication error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let client_id = var("TDX_CLIENT_ID").unwrap_or_else(|| {
            warn!("TDX_CLIENT_ID not set. API calls will fail.");
            String::new()
        });
        let client_secret = var("TDX_CLIENT_SECRET").unwrap_or_else(|| {
            warn!("TDX_CLIENT_SECRET not set. API calls will fail.");
            String::new()
        });

        let timeout_secs = parse_or(&var, "HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "HTTP_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        let mut auth = AuthConfig::new().with_timeout(timeout_secs);
        if let Some(url) = var("TDX_AUTH_URL") {
            auth = auth.with_auth_url(url);
        }

        let mut tdx = TdxConfig::new().with_timeout(timeout_secs);
        if let Some(url) = var("TDX_LIVE_BOARD_URL") {
            tdx = tdx.with_live_board_url(url);
        }
        if let Some(url) = var("TDX_STATION_URL") {
            tdx = tdx.with_station_url(url);
        }

        let defaults = MapConfig::default();
        let map = MapConfig::default()
            .with_center(
                parse_checked(&var, "MAP_CENTER_LAT", defaults.center_lat, is_latitude)?,
                parse_checked(&var, "MAP_CENTER_LON", defaults.center_lon, is_longitude)?,
                parse_or(&var, "MAP_ZOOM", defaults.zoom)?,
            )
            .with_delay_threshold(parse_or(
                &var,
                "DELAY_THRESHOLD_MINUTES",
                defaults.delay_threshold_minutes,
            )?);

        let name_locales: Vec<String> = var("STATION_NAME_LOCALES")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .filter(|locales: &Vec<String>| !locales.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_NAME_LOCALE.to_string()]);

        let refresh_secs = parse_or(&var, "REFRESH_INTERVAL_SECS", DEFAULT_REFRESH_INTERVAL_SECS)?;
        if refresh_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "REFRESH_INTERVAL_SECS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            credentials: ClientCredentials::new(client_id, client_secret),
            auth,
            tdx,
            map,
            name_locales,
            token_safety_margin_secs: parse_checked(
                &var,
                "TOKEN_SAFETY_MARGIN_SECS",
                DEFAULT_TOKEN_SAFETY_MARGIN_SECS,
                |secs| (0..=MAX_EXPIRES_IN_SECS).contains(&secs),
            )?,
            refresh_interval: Duration::from_secs(refresh_secs),
            listen_addr: parse_or(&var, "LISTEN_ADDR", SocketAddr::from(DEFAULT_LISTEN_ADDR))?,
        })
    }
}

/// Parse `key` if set, otherwise use `default`.
fn parse_or<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(key) {
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::Invalid { key, value }),
        },
        None => Ok(default),
    }
}

/// Like [`parse_or`], but a parsed value must also pass `valid`.
fn parse_checked<T: FromStr + Copy>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
    valid: impl Fn(T) -> bool,
) -> Result<T, ConfigError> {
    let parsed = parse_or(var, key, default)?;
    if valid(parsed) {
        Ok(parsed)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: var(key).unwrap_or_default(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
