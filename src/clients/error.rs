use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Coarse classification of a failed backend call.
///
/// Callers only ever need to tell these three apart; the backend's own
/// finer-grained code is kept in [`ApiError::server_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The server answered and rejected the request.
    ApiError,
    /// No response was received.
    NetworkError,
    /// Anything else, including undecodable responses.
    UnknownError,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ApiError => "API_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error carried by every rejected query or mutation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub code: ErrorCode,

    /// Human-readable, suitable for a banner.
    pub message: String,

    /// HTTP status when a response was received.
    pub status: Option<u16>,

    /// Code string from the envelope's error body, e.g. `NOT_FOUND`.
    pub server_code: Option<String>,

    pub details: Option<serde_json::Value>,
}

pub(crate) const DEFAULT_API_MESSAGE: &str = "An error occurred";
pub(crate) const NETWORK_MESSAGE: &str = "Network error. Please check your connection.";

impl ApiError {
    pub fn api(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            code: ErrorCode::ApiError,
            message: message.into(),
            status,
            server_code: None,
            details: None,
        }
    }

    #[must_use]
    pub fn network() -> Self {
        Self {
            code: ErrorCode::NetworkError,
            message: NETWORK_MESSAGE.to_string(),
            status: None,
            server_code: None,
            details: None,
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::UnknownError,
            message: message.into(),
            status: None,
            server_code: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_server_code(mut self, code: Option<String>) -> Self {
        self.server_code = code;
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: Option<serde_json::Value>) -> Self {
        self.details = details;
        self
    }

    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self.code, ErrorCode::NetworkError)
    }
}
