//! Crate-level error types for the Wasender integration.

use thiserror::Error;

/// Alias for `Result<T, WasenderError>`.
pub type WasenderResult<T> = Result<T, WasenderError>;

/// Status reported by [`WasenderError::MaxRetriesExceeded`].
pub const RATE_LIMITED_STATUS: u16 = 429;

/// Uniform error type used across the Wasender crate.
#[derive(Debug, Clone, Error)]
pub enum WasenderError {
    /// Missing token or invalid configuration. Raised before any request.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required message field is missing or malformed.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Non-2xx response from the upstream API.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        /// Response body parsed as JSON, when it was JSON.
        body: Option<serde_json::Value>,
        /// Response body as received.
        raw: String,
    },

    /// The retry loop ran out of attempts without a terminal response.
    #[error("Max retries exceeded")]
    MaxRetriesExceeded,

    #[error("network error: {0}")]
    Network(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl WasenderError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_message(msg: impl Into<String>) -> Self {
        Self::InvalidMessage(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Build from an upstream non-success response.
    pub fn from_api_response(status: u16, raw: &str) -> Self {
        Self::Api {
            status,
            message: format!("Wasender API error: {}", raw),
            body: serde_json::from_str(raw).ok(),
            raw: raw.to_string(),
        }
    }

    /// HTTP status carried by the error, if it has one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::MaxRetriesExceeded => Some(RATE_LIMITED_STATUS),
            _ => None,
        }
    }

    /// Parsed JSON response body, for API errors.
    pub fn response(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Api { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(RATE_LIMITED_STATUS)
    }
}

impl From<reqwest::Error> for WasenderError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

impl From<serde_json::Error> for WasenderError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
