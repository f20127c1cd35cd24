//! Mail provider error types.

use thiserror::Error;

/// Errors from calls to the mail provider API.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    ClientSetup(String),

    /// The request did not complete (connect failure, timeout, TLS).
    #[error("Request to provider failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("Failed to decode provider response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else {
            ProviderError::Request(err.to_string())
        }
    }
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
