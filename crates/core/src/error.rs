//! Core Error Types
//!
//! Foundational error types shared across the Spend Arena workspace. Kept
//! dependency-free (thiserror + serde_json) so the reducer crate stays light.
//!
//! The client and server crates extend these with transport and storage
//! failures of their own.

use thiserror::Error;

/// Core error type for the Spend Arena workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// An agent name outside the closed conservative/aggressive/balanced set
    #[error("Unknown agent type: {0}")]
    UnknownAgent(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Parse errors
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create an unknown agent error
    pub fn unknown_agent(name: impl Into<String>) -> Self {
        Self::UnknownAgent(name.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
