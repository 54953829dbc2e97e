//! Error types for graph construction and execution

use council_data::VendorError;
use thiserror::Error;

/// Result type alias for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised while building or driving the workflow graph
#[derive(Debug, Error)]
pub enum GraphError {
    /// Malformed graph configuration (empty or unknown analyst list).
    /// Fatal at construction time, never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The run exceeded the stage-transition safety limit, indicating
    /// a debate or tool loop that did not terminate as expected
    #[error("Graph recursion limit of {limit} stage transitions exceeded")]
    RecursionLimit { limit: u32 },

    /// A stage failed while executing
    #[error("Stage '{node}' failed: {message}")]
    Stage { node: String, message: String },

    /// The vendor fallback chain was exhausted
    #[error("Vendor error: {0}")]
    Vendor(#[from] VendorError),

    /// Language-model call failed
    #[error("Model error: {0}")]
    Model(String),
}

impl From<council_core::CoreError> for GraphError {
    fn from(err: council_core::CoreError) -> Self {
        match err {
            council_core::CoreError::Config(msg) => Self::Configuration(msg),
            other => Self::Model(other.to_string()),
        }
    }
}
