//! Client error types

use thiserror::Error;

/// Errors raised by the resource client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connect, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Entity fetch answered with a non-2xx status
    #[error("not found: {url}")]
    NotFound { url: String },

    /// Write rejected by the upstream API
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Body could not be decoded into the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
