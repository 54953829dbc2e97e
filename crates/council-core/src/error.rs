//! Error types shared across the debate pipeline

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the shared core types
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid run configuration, fatal at construction time
    #[error("Configuration error: {0}")]
    Config(String),

    /// Language-model call failed
    #[error("Model error: {0}")]
    Model(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
