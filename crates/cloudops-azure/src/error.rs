//! Error types for Azure REST calls.

use thiserror::Error;

/// Result type alias using `AzureError`.
pub type AzureResult<T> = Result<T, AzureError>;

/// Errors that can occur when talking to Azure APIs.
#[derive(Debug, Error)]
pub enum AzureError {
    /// Client construction or configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// `OAuth2` token acquisition failed.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The remote API answered with a non-success status.
    ///
    /// `code` is the service error code from the `{"error": {...}}`
    /// envelope when one was present, the HTTP status text otherwise.
    #[error("API error ({status}): {code} - {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// A pagination link pointed away from the API host.
    #[error("Refusing to follow link to another host: {0}")]
    ForeignHost(String),

    /// Still throttled after the configured number of retries.
    #[error("Still throttled after {attempts} retries")]
    Throttled { attempts: u32 },
}

impl AzureError {
    /// Returns the HTTP status of an API error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns the service error code of an API error.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Returns true if this is a 404 from the remote API.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns true if retrying the same request later may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Api { status, .. } => matches!(status, 408 | 429 | 500 | 502 | 503 | 504),
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Throttled { .. } => true,
            _ => false,
        }
    }
}
