//! Client-credentials token exchange and caching.
//!
//! TDX hands out bearer tokens that live for about a day. The
//! [`CredentialManager`] keeps the current one and only goes back to the
//! token endpoint once it is within the safety margin of expiring.

use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use super::error::{AuthError, body_snippet};
use super::types::TokenResponse;

/// Default token endpoint.
const DEFAULT_AUTH_URL: &str =
    "https://tdx.transportdata.tw/auth/realms/TDXConnect/protocol/openid-connect/token";

/// Lifetime assumed when the token response omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Default margin subtracted from the reported lifetime.
const DEFAULT_SAFETY_MARGIN_SECS: i64 = 60;

/// Upper bound on a reported lifetime and on the safety margin.
pub const MAX_EXPIRES_IN_SECS: i64 = 7 * 24 * 60 * 60;

/// Client identifier and secret issued by TDX.
#[derive(Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// A freshly issued token and its reported lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub expires_in_secs: i64,
}

/// Performs the actual credential exchange.
///
/// This abstraction allows the caching policy to be tested without a
/// token endpoint.
pub trait TokenExchange {
    fn exchange(
        &self,
        credentials: &ClientCredentials,
    ) -> impl Future<Output = Result<TokenGrant, AuthError>> + Send;
}

/// Configuration for the HTTP token exchange.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Token endpoint URL
    pub auth_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl AuthConfig {
    pub fn new() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            timeout_secs: 20,
        }
    }

    /// Set a custom token endpoint (for testing).
    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Token exchange against the TDX OpenID Connect endpoint.
#[derive(Debug, Clone)]
pub struct HttpTokenExchange {
    http: reqwest::Client,
    auth_url: String,
}

impl HttpTokenExchange {
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            auth_url: config.auth_url,
        })
    }
}

impl TokenExchange for HttpTokenExchange {
    async fn exchange(&self, credentials: &ClientCredentials) -> Result<TokenGrant, AuthError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(&self.auth_url)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Status {
                status: status.as_u16(),
                message: body_snippet(&body),
            });
        }

        let body = response.text().await?;
        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| AuthError::Json {
            message: e.to_string(),
        })?;

        let access_token = token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        Ok(TokenGrant {
            access_token,
            expires_in_secs: token.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS),
        })
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Owns the bearer token for one set of client credentials.
///
/// The cache is refreshed under its lock: a caller that waited while another
/// one refreshed finds a valid token on re-check and returns it without a
/// second exchange.
pub struct CredentialManager<E = HttpTokenExchange> {
    exchange: E,
    credentials: ClientCredentials,
    safety_margin: Duration,
    cached: Mutex<Option<CachedToken>>,
}

impl<E: TokenExchange> CredentialManager<E> {
    pub fn new(exchange: E, credentials: ClientCredentials) -> Self {
        Self {
            exchange,
            credentials,
            safety_margin: Duration::seconds(DEFAULT_SAFETY_MARGIN_SECS),
            cached: Mutex::new(None),
        }
    }

    /// Set how long before the reported expiry a token stops being reused.
    /// Clamped to [0, [`MAX_EXPIRES_IN_SECS`]].
    pub fn with_safety_margin(mut self, margin: Duration) -> Self {
        self.safety_margin = margin.clamp(
            Duration::zero(),
            Duration::seconds(MAX_EXPIRES_IN_SECS),
        );
        self
    }

    /// Return a valid bearer token, exchanging credentials if needed.
    pub async fn get_token(&self) -> Result<String, AuthError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(current) = cached.as_ref()
            && now < current.expires_at
        {
            return Ok(current.token.clone());
        }

        let grant = self.exchange.exchange(&self.credentials).await?;
        let lifetime = Duration::seconds(grant.expires_in_secs.clamp(0, MAX_EXPIRES_IN_SECS));
        // On overflow the token is used once and never reused.
        let expires_at = now
            .checked_add_signed(lifetime)
            .and_then(|at| at.checked_sub_signed(self.safety_margin))
            .unwrap_or(now);
        debug!(%expires_at, "obtained new TDX access token");

        *cached = Some(CachedToken {
            token: grant.access_token.clone(),
            expires_at,
        });

        Ok(grant.access_token)
    }

    /// Forget the cached token so the next call re-authenticates.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    /// When the cached token stops being reused, if there is one.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.cached.lock().await.as_ref().map(|c| c.expires_at)
    }

    #[cfg(test)]
    fn with_cached_token(self, token: &str, expires_at: DateTime<Utc>) -> Self {
        Self {
            cached: Mutex::new(Some(CachedToken {
                token: token.to_string(),
                expires_at,
            })),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Exchange that hands out numbered tokens and counts calls.
    struct CountingExchange {
        calls: AtomicUsize,
        expires_in_secs: i64,
        fail: bool,
    }

    impl CountingExchange {
        fn new(expires_in_secs: i64) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                expires_in_secs,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(3600)
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TokenExchange for CountingExchange {
        async fn exchange(&self, _: &ClientCredentials) -> Result<TokenGrant, AuthError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(AuthError::Status {
                    status: 401,
                    message: "invalid_client".into(),
                });
            }
            Ok(TokenGrant {
                access_token: format!("token-{n}"),
                expires_in_secs: self.expires_in_secs,
            })
        }
    }

    fn credentials() -> ClientCredentials {
        ClientCredentials::new("id", "secret")
    }

    #[tokio::test]
    async fn valid_cached_token_needs_no_exchange() {
        let manager = CredentialManager::new(CountingExchange::new(3600), credentials())
            .with_cached_token("cached", Utc::now() + Duration::minutes(10));

        assert_eq!(manager.get_token().await.unwrap(), "cached");
        assert_eq!(manager.get_token().await.unwrap(), "cached");
        assert_eq!(manager.exchange.call_count(), 0);
    }

    #[tokio::test]
    async fn expired_token_is_exchanged_once() {
        let manager = CredentialManager::new(CountingExchange::new(3600), credentials())
            .with_cached_token("stale", Utc::now() - Duration::seconds(1));

        assert_eq!(manager.get_token().await.unwrap(), "token-1");
        assert_eq!(manager.exchange.call_count(), 1);

        // The fresh token is now cached.
        assert_eq!(manager.get_token().await.unwrap(), "token-1");
        assert_eq!(manager.exchange.call_count(), 1);
        assert!(manager.expires_at().await.unwrap() > Utc::now());
    }

    #[tokio::test]
    async fn expiry_includes_safety_margin() {
        let manager = CredentialManager::new(CountingExchange::new(3600), credentials())
            .with_safety_margin(Duration::seconds(60));

        let before = Utc::now();
        manager.get_token().await.unwrap();
        let expires_at = manager.expires_at().await.unwrap();

        assert!(expires_at <= Utc::now() + Duration::seconds(3540));
        assert!(expires_at >= before + Duration::seconds(3540));
    }

    #[tokio::test]
    async fn token_shorter_than_margin_is_never_reused() {
        let manager = CredentialManager::new(CountingExchange::new(30), credentials());

        assert_eq!(manager.get_token().await.unwrap(), "token-1");
        assert_eq!(manager.get_token().await.unwrap(), "token-2");
        assert_eq!(manager.exchange.call_count(), 2);
    }

    #[tokio::test]
    async fn oversized_safety_margin_is_clamped() {
        let manager = CredentialManager::new(CountingExchange::new(3600), credentials())
            .with_safety_margin(Duration::seconds(1_000_000_000_000));
        assert_eq!(manager.safety_margin, Duration::seconds(MAX_EXPIRES_IN_SECS));

        assert_eq!(manager.get_token().await.unwrap(), "token-1");
        assert!(manager.expires_at().await.unwrap() <= Utc::now());

        // The margin exceeds the lifetime, so nothing is reused.
        assert_eq!(manager.get_token().await.unwrap(), "token-2");
        assert_eq!(manager.exchange.call_count(), 2);
    }

    #[tokio::test]
    async fn negative_safety_margin_is_zero() {
        let manager = CredentialManager::new(CountingExchange::new(3600), credentials())
            .with_safety_margin(Duration::seconds(-30));
        assert_eq!(manager.safety_margin, Duration::zero());
    }

    #[tokio::test]
    async fn failed_exchange_caches_nothing() {
        let manager = CredentialManager::new(CountingExchange::failing(), credentials());

        let err = manager.get_token().await.unwrap_err();
        assert!(matches!(err, AuthError::Status { status: 401, .. }));
        assert!(manager.expires_at().await.is_none());

        manager.get_token().await.unwrap_err();
        assert_eq!(manager.exchange.call_count(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_new_exchange() {
        let manager = CredentialManager::new(CountingExchange::new(3600), credentials());

        assert_eq!(manager.get_token().await.unwrap(), "token-1");
        manager.invalidate().await;
        assert_eq!(manager.get_token().await.unwrap(), "token-2");
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_exchange() {
        let manager = Arc::new(CredentialManager::new(
            CountingExchange::new(3600),
            credentials(),
        ));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.get_token().await })
            })
            .collect();

        for task in futures::future::join_all(tasks).await {
            assert_eq!(task.unwrap().unwrap(), "token-1");
        }
        assert_eq!(manager.exchange.call_count(), 1);
    }

    #[test]
    fn credentials_debug_hides_secret() {
        let debug = format!("{:?}", ClientCredentials::new("id", "hunter2"));
        assert!(debug.contains("id"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn config_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.auth_url, DEFAULT_AUTH_URL);
        assert_eq!(config.timeout_secs, 20);

        let config = AuthConfig::new()
            .with_auth_url("http://localhost:8080/token")
            .with_timeout(5);
        assert_eq!(config.auth_url, "http://localhost:8080/token");
        assert_eq!(config.timeout_secs, 5);
    }
}
