//! Data-vendor routing layer
//!
//! Resolves an abstract data operation (e.g. "get price history") to an
//! ordered chain of interchangeable vendors and executes with fallback.
//! Configured vendors are tried first; every other vendor that
//! implements the operation is appended as an extra fallback candidate.

pub mod config;
pub mod error;
pub mod operation;
pub mod retry;
pub mod router;
pub mod vendor;

pub use config::VendorConfig;
pub use error::{Result, VendorError};
pub use operation::{DataOperation, OperationCategory};
pub use retry::RetryPolicy;
pub use router::VendorRouter;
pub use vendor::{DataVendor, VendorRegistry};
