//! Client error types

use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connection refused, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No response within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// The server rejected the request with a typed error
    #[error("API error {}: {}", .0.code, .0.message)]
    Api(AppError),

    /// A submission of the same form is still in flight
    #[error("Another submission is in progress")]
    Busy,

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Error code reported by the server, if any
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Api(err) => Some(err.code),
            _ => None,
        }
    }

    /// Whether resubmitting the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout => true,
            Self::Http(err) => err.is_connect() || err.is_timeout(),
            Self::Api(err) => err.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
