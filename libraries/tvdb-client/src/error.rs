//! Error types for the TheTVDB client.

use thiserror::Error;

/// Errors that can occur when talking to TheTVDB.
#[derive(Error, Debug)]
pub enum TvdbError {
    /// The request did not complete within the configured timeout
    #[error("Request timed out: {0}")]
    TimedOut(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Failed to parse an XML document
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Invalid base URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// IO error while writing downloaded files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The caller cancelled the request
    #[error("Request cancelled")]
    Cancelled,
}

impl TvdbError {
    /// Whether the failure was a transport timeout.
    pub fn is_timed_out(&self) -> bool {
        matches!(self, TvdbError::TimedOut(_))
    }

    /// Classify a reqwest error, separating timeouts from other failures.
    pub(crate) fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TvdbError::TimedOut(err.to_string())
        } else {
            TvdbError::Request(err)
        }
    }
}

/// Result type for TheTVDB client operations.
pub type Result<T> = std::result::Result<T, TvdbError>;
