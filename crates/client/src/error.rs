//! Client Error Types

use thiserror::Error;

/// Errors raised while talking to the analysis gateway.
///
/// Everything is flattened to strings so the error can be cloned into the
/// board state and across task boundaries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Network-level failure (connection refused, reset, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// Connecting took longer than the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// The gateway answered with a non-success status
    #[error("HTTP error {status}: {body}")]
    HttpError { status: u16, body: String },

    /// Response body could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Base URL or session path could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The body stream broke after the connection was established
    #[error("Stream error: {0}")]
    StreamError(String),
}

impl ClientError {
    /// True for failures reported before any body was received.
    pub fn is_connect_failure(&self) -> bool {
        matches!(
            self,
            ClientError::Network(_) | ClientError::Timeout | ClientError::HttpError { .. }
        )
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::InvalidResponse(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
