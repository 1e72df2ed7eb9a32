//! Error types for search, render and highlight operations
//!
//! Only configuration problems and a failed first results page abort a
//! request. Everything else degrades: render failures fall back to the
//! synthetic preview, unlocatable matches and malformed rule URLs are
//! logged and skipped.

use thiserror::Error;

/// Result type alias for stillbrook operations
pub type StillbrookResult<T> = Result<T, StillbrookError>;

/// Error types surfaced by the search pipeline
#[derive(Debug, Error)]
pub enum StillbrookError {
    /// Missing provider credential or unusable configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Search provider returned a non-2xx status or an `error` payload
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Browser rendering and the plain fetch fallback both failed
    #[error("{0}")]
    Render(String),

    /// Caller supplied an unusable parameter (empty keyword, bad URL)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider payload could not be decoded
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl StillbrookError {
    /// Message safe to show the caller and store in an audit record
    #[must_use]
    pub fn audit_message(&self) -> String {
        match self {
            StillbrookError::Configuration(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}
