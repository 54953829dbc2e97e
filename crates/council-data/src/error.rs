//! Error types for the vendor routing layer

use crate::operation::DataOperation;
use thiserror::Error;

/// Result type alias for vendor operations
pub type Result<T> = std::result::Result<T, VendorError>;

/// Errors raised by vendors and the routing layer
#[derive(Debug, Error)]
pub enum VendorError {
    /// Vendor signalled a rate limit. Handled identically to a generic
    /// failure today: skip to the next candidate, never retry the same
    /// vendor.
    #[error("Rate limit exceeded for {vendor}")]
    RateLimited { vendor: String },

    /// Generic vendor failure
    #[error("Vendor {vendor} failed: {message}")]
    Failed { vendor: String, message: String },

    /// Configured vendor name is not registered. Fatal at router
    /// construction time.
    #[error("Unknown vendor in configuration: {0}")]
    UnknownVendor(String),

    /// Every candidate in the fallback chain raised or returned nothing
    #[error("All {attempts} vendor attempts failed for operation '{operation}'")]
    AllVendorsFailed {
        operation: DataOperation,
        attempts: u32,
    },
}

impl VendorError {
    /// Whether this error is the rate-limit class
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
