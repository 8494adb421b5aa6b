//! TDX client error types.

use std::fmt;

/// How much of an upstream body to keep in an error.
pub(crate) const BODY_SNIPPET_CHARS: usize = 500;

/// The leading part of `body`, at most [`BODY_SNIPPET_CHARS`] characters.
pub(crate) fn body_snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_CHARS).collect()
}

/// Which TDX data resource a request was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// The live train board (`TrainLiveBoards`).
    LiveBoard,
    /// The station directory (`Stations`).
    Stations,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::LiveBoard => write!(f, "live board"),
            Resource::Stations => write!(f, "station directory"),
        }
    }
}

/// Errors from the client-credentials token exchange.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Token request failed (network error, timeout, etc.)
    #[error("token request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Token endpoint returned a non-2xx status
    #[error("token endpoint returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Token response was not valid JSON
    #[error("token response parse error: {message}")]
    Json { message: String },

    /// Token response did not carry an `access_token`
    #[error("token response did not contain an access token")]
    MissingToken,
}

/// Errors from the authenticated data endpoints.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// No bearer token could be obtained
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// The HTTP client could not be constructed
    #[error("HTTP client setup failed: {0}")]
    Setup(#[source] reqwest::Error),

    /// HTTP request failed (network error, timeout, etc.)
    #[error("{resource} request failed: {source}")]
    Http {
        resource: Resource,
        #[source]
        source: reqwest::Error,
    },

    /// Endpoint rejected the bearer token
    #[error("{resource} request unauthorized (token rejected)")]
    Unauthorized { resource: Resource },

    /// Endpoint returned a non-2xx status
    #[error("{resource} returned {status}: {message}")]
    Status {
        resource: Resource,
        status: u16,
        message: String,
    },

    /// Response body was not the expected JSON
    #[error("{resource} JSON parse error: {message}")]
    Json {
        resource: Resource,
        message: String,
        body: Option<String>,
    },
}

impl FetchError {
    /// The resource this error relates to, if any.
    pub fn resource(&self) -> Option<Resource> {
        match self {
            FetchError::Auth(_) | FetchError::Setup(_) => None,
            FetchError::Http { resource, .. }
            | FetchError::Unauthorized { resource }
            | FetchError::Status { resource, .. }
            | FetchError::Json { resource, .. } => Some(*resource),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_display() {
        let err = AuthError::MissingToken;
        assert_eq!(
            err.to_string(),
            "token response did not contain an access token"
        );

        let err = AuthError::Status {
            status: 401,
            message: "invalid_client".into(),
        };
        assert_eq!(err.to_string(), "token endpoint returned 401: invalid_client");
    }

    #[test]
    fn fetch_error_display() {
        let err = FetchError::Status {
            resource: Resource::Stations,
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(
            err.to_string(),
            "station directory returned 503: Service Unavailable"
        );
        assert_eq!(err.resource(), Some(Resource::Stations));

        let err = FetchError::Unauthorized {
            resource: Resource::LiveBoard,
        };
        assert!(err.to_string().contains("live board"));

        let err = FetchError::from(AuthError::MissingToken);
        assert!(err.to_string().starts_with("authentication failed"));
        assert_eq!(err.resource(), None);
    }

    #[test]
    fn body_snippet_keeps_leading_characters() {
        assert_eq!(body_snippet("short"), "short");

        let long = "臺".repeat(BODY_SNIPPET_CHARS + 10);
        let snippet = body_snippet(&long);
        assert_eq!(snippet.chars().count(), BODY_SNIPPET_CHARS);
        assert!(long.starts_with(&snippet));
    }
}
