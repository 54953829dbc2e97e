//! Vendor contract and registry

use crate::error::Result;
use crate::operation::DataOperation;
use async_trait::async_trait;
use std::sync::Arc;

/// A concrete implementation of one or more abstract data operations.
///
/// Vendors either return a string result or raise a [`crate::VendorError`].
/// [`crate::VendorError::RateLimited`] is the distinguished rate-limit
/// signal; the router treats it the same as any other failure.
#[async_trait]
pub trait DataVendor: Send + Sync {
    /// Stable vendor name used in configuration (e.g. "yfinance")
    fn name(&self) -> &str;

    /// Whether this vendor implements the given operation
    fn supports(&self, operation: DataOperation) -> bool;

    /// Execute a single implementation of the operation
    async fn fetch(&self, operation: DataOperation, args: &serde_json::Value) -> Result<String>;

    /// Execute every implementation this vendor has for the operation.
    ///
    /// Vendors backed by several underlying feeds for the same
    /// operation override this; the router collects all successes from
    /// one vendor as a single batch. The default is the single `fetch`.
    async fn fetch_all(
        &self,
        operation: DataOperation,
        args: &serde_json::Value,
    ) -> Vec<Result<String>> {
        vec![self.fetch(operation, args).await]
    }
}

/// Registered vendors in their fixed default fallback order.
///
/// Registration order defines the order in which unconfigured vendors
/// are appended to a fallback chain.
#[derive(Clone, Default)]
pub struct VendorRegistry {
    vendors: Vec<Arc<dyn DataVendor>>,
}

impl VendorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a vendor. Order of registration is the default
    /// fallback order.
    pub fn register(&mut self, vendor: Arc<dyn DataVendor>) {
        self.vendors.push(vendor);
    }

    /// Builder-style registration
    pub fn with_vendor(mut self, vendor: Arc<dyn DataVendor>) -> Self {
        self.register(vendor);
        self
    }

    /// Look up a vendor by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn DataVendor>> {
        self.vendors.iter().find(|v| v.name() == name)
    }

    /// Whether a vendor name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names of all vendors implementing `operation`, in default order
    pub fn implementors(&self, operation: DataOperation) -> Vec<String> {
        self.vendors
            .iter()
            .filter(|v| v.supports(operation))
            .map(|v| v.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }
}
