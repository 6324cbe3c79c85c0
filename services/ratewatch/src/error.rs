//! Error types for the ratewatch service

/// Errors that can occur in the ratewatch service
#[derive(Debug, thiserror::Error)]
pub enum RateWatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Notification sink error: {0}")]
    Sink(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for ratewatch operations
pub type Result<T> = std::result::Result<T, RateWatchError>;
