//! Remote completion error types

use thiserror::Error;

/// Errors that can occur while talking to a remote completion provider
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unauthorized, check the configured API key")]
    Unauthorized,

    #[error("Response parsing failed: {0}")]
    ResponseParsing(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl RemoteError {
    /// Map an HTTP error status onto the matching variant
    pub fn from_status(status: u16, message: String) -> Self {
        if status == 401 {
            RemoteError::Unauthorized
        } else {
            RemoteError::Api { status, message }
        }
    }

    /// Check if this is an authentication failure
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, RemoteError::Unauthorized)
    }
}
