//! Vendor configuration and chain resolution

use crate::operation::{DataOperation, OperationCategory};
use crate::vendor::VendorRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping from operation category to an ordered, comma-separated
/// vendor priority list, plus per-operation overrides that take
/// priority over the category mapping.
///
/// Resolution always yields an ordering over every vendor implementing
/// an operation: unconfigured implementors are appended as extra
/// fallback candidates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VendorConfig {
    /// Category-level priority lists, e.g. `core_stock_apis: "yfinance,local"`
    #[serde(default)]
    pub categories: HashMap<OperationCategory, String>,

    /// Per-operation overrides, e.g. `get_news: "google"`
    #[serde(default)]
    pub overrides: HashMap<DataOperation, String>,
}

/// Resolved vendor chain for one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Explicitly configured vendors, in priority order
    pub primaries: Vec<String>,
    /// Full fallback chain: primaries first, then every other
    /// implementor in default order, deduplicated
    pub chain: Vec<String>,
}

impl Resolution {
    /// With zero or one configured primary, execution stops at the
    /// first vendor that yields a result. Multiple primaries aggregate.
    pub fn single_primary(&self) -> bool {
        self.primaries.len() <= 1
    }
}

impl VendorConfig {
    /// Set a category-level priority list
    pub fn with_category(
        mut self,
        category: OperationCategory,
        vendors: impl Into<String>,
    ) -> Self {
        self.categories.insert(category, vendors.into());
        self
    }

    /// Set a per-operation override
    pub fn with_override(mut self, operation: DataOperation, vendors: impl Into<String>) -> Self {
        self.overrides.insert(operation, vendors.into());
        self
    }

    /// The configured value for an operation: override first, else the
    /// operation's category entry.
    fn configured(&self, operation: DataOperation) -> Option<&str> {
        self.overrides
            .get(&operation)
            .or_else(|| self.categories.get(&operation.category()))
            .map(String::as_str)
    }

    /// Configured primaries for an operation, comma-split and trimmed
    pub fn primaries(&self, operation: DataOperation) -> Vec<String> {
        self.configured(operation)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolve the full fallback chain for an operation against the
    /// registered vendors.
    pub fn resolve(&self, operation: DataOperation, registry: &VendorRegistry) -> Resolution {
        let primaries = self.primaries(operation);
        let mut chain = primaries.clone();
        for name in registry.implementors(operation) {
            if !chain.contains(&name) {
                chain.push(name);
            }
        }
        Resolution { primaries, chain }
    }

    /// Every vendor name mentioned anywhere in the configuration
    pub fn mentioned_vendors(&self) -> Vec<String> {
        let mut names = Vec::new();
        for value in self.categories.values().chain(self.overrides.values()) {
            for name in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                if !names.contains(&name.to_string()) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }
}
