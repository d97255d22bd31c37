//! Error types for endpoint-smoke

use std::io;
use thiserror::Error;

/// Result type for endpoint-smoke operations
pub type Result<T> = std::result::Result<T, SmokeError>;

/// Errors that can occur while running checks
#[derive(Debug, Error)]
pub enum SmokeError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// URI could not be built from base URL, path and query
    #[error("Invalid URI '{uri}': {reason}")]
    InvalidUri {
        /// The URI that failed to parse
        uri: String,
        /// Parser message
        reason: String,
    },

    /// Request header name or value rejected
    #[error("Invalid header '{0}'")]
    InvalidHeader(String),

    /// Request could not be sent or the response could not be read
    #[error("Request failed: {0}")]
    Request(String),

    /// No complete response within the configured timeout
    #[error("Request timed out after {timeout_ms} ms")]
    Timeout {
        /// Timeout that elapsed
        timeout_ms: u64,
    },

    /// Response body is not valid JSON
    #[error("Invalid JSON in response body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Response body exceeds the configured limit
    #[error("Response body exceeds limit of {limit} bytes")]
    DataTooLarge {
        /// Size limit
        limit: usize,
    },
}
