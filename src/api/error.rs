//! Error types for the ticket API client

use thiserror::Error;

/// Result type for ticket API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by the ticket API client
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Not authorized")]
    Unauthorized,

    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ApiError {
    /// Create a status error from a non-2xx response
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Whether the user has to sign in again before retrying
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::SessionExpired)
    }
}
