//! Error types for the Scholar client.

use std::time::Duration;

/// Errors that can occur while talking to Google Scholar or persisting output.
#[derive(Debug, thiserror::Error)]
pub enum ScholarError {
    /// HTTP request failed (network, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Scholar answered with a non-success status code.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Rate limited or blocked by Scholar (HTTP 429).
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    /// Local I/O failed (snapshot directory, stdin/stdout).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for Results using [`ScholarError`].
pub type Result<T> = std::result::Result<T, ScholarError>;
