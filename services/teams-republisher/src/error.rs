//! Error types for the Teams republisher

/// Errors that can occur while republishing a notification
#[derive(Debug, thiserror::Error)]
pub enum RepublisherError {
    /// Invalid or missing command-line parameter or settings value
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The webhook answered, but rejected the message
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// No dashboard panel is configured for a check command
    #[error("Dashboard link unavailable: {0}")]
    LinkUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for republisher operations
pub type Result<T> = std::result::Result<T, RepublisherError>;
