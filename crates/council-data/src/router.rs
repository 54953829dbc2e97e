//! Vendor router: ordered-fallback execution of data operations
//!
//! Stateless per call: configuration and registry are read-only after
//! construction, so one router is safely shared across concurrent runs.

use crate::config::VendorConfig;
use crate::error::{Result, VendorError};
use crate::operation::DataOperation;
use crate::vendor::VendorRegistry;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Resolves an operation to its vendor chain and executes with fallback
#[derive(Clone)]
pub struct VendorRouter {
    config: Arc<VendorConfig>,
    registry: Arc<VendorRegistry>,
}

impl VendorRouter {
    /// Build a router, validating that every configured vendor name is
    /// registered. An unknown name is a fatal configuration error.
    pub fn new(config: VendorConfig, registry: VendorRegistry) -> Result<Self> {
        for name in config.mentioned_vendors() {
            if !registry.contains(&name) {
                return Err(VendorError::UnknownVendor(name));
            }
        }
        Ok(Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
        })
    }

    /// The resolved vendor-name chain for an operation
    pub fn resolve(&self, operation: DataOperation) -> Vec<String> {
        self.config.resolve(operation, &self.registry).chain
    }

    /// Execute an operation across the resolved fallback chain.
    ///
    /// Each candidate vendor runs all of its implementations; successes
    /// from one vendor are collected as a batch. Rate-limit errors are
    /// treated like any other failure: skip to the next candidate. With
    /// a single configured primary the first successful vendor ends the
    /// search; with multiple primaries results aggregate across the
    /// chain. Exhaustion of every candidate raises
    /// [`VendorError::AllVendorsFailed`].
    pub async fn execute(
        &self,
        operation: DataOperation,
        args: &serde_json::Value,
    ) -> Result<String> {
        let resolution = self.config.resolve(operation, &self.registry);
        debug!(
            operation = %operation,
            primaries = ?resolution.primaries,
            chain = ?resolution.chain,
            "resolved vendor chain"
        );

        let mut results: Vec<String> = Vec::new();
        let mut attempts = 0_u32;

        for name in &resolution.chain {
            let is_primary = resolution.primaries.contains(name);
            let Some(vendor) = self.registry.get(name) else {
                // Unknown names are rejected at construction; chain
                // entries always resolve.
                continue;
            };
            if !vendor.supports(operation) {
                if is_primary {
                    info!(
                        vendor = name,
                        operation = %operation,
                        "configured vendor does not implement operation, falling back"
                    );
                }
                continue;
            }

            attempts += 1;
            debug!(
                vendor = name,
                operation = %operation,
                attempt = attempts,
                primary = is_primary,
                "trying vendor"
            );

            let mut vendor_results = Vec::new();
            for outcome in vendor.fetch_all(operation, args).await {
                match outcome {
                    Ok(result) => vendor_results.push(result),
                    Err(e) if e.is_rate_limit() => {
                        warn!(vendor = name, operation = %operation, error = %e,
                            "vendor rate limited, falling back");
                    }
                    Err(e) => {
                        warn!(vendor = name, operation = %operation, error = %e,
                            "vendor failed, falling back");
                    }
                }
            }

            if vendor_results.is_empty() {
                debug!(vendor = name, operation = %operation, "vendor produced no results");
                continue;
            }

            debug!(
                vendor = name,
                operation = %operation,
                count = vendor_results.len(),
                "vendor succeeded"
            );
            results.extend(vendor_results);

            if resolution.single_primary() {
                break;
            }
        }

        if results.is_empty() {
            warn!(operation = %operation, attempts, "all vendor attempts failed");
            return Err(VendorError::AllVendorsFailed {
                operation,
                attempts,
            });
        }

        if results.len() == 1 {
            Ok(results.remove(0))
        } else {
            Ok(results.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OperationCategory;
    use crate::vendor::DataVendor;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted vendor: counts calls, returns the configured outcome.
    struct ScriptedVendor {
        name: &'static str,
        ops: Vec<DataOperation>,
        outcome: Outcome,
        calls: AtomicUsize,
    }

    enum Outcome {
        Ok(&'static str),
        Multi(Vec<std::result::Result<&'static str, &'static str>>),
        RateLimited,
        Fails,
    }

    impl ScriptedVendor {
        fn new(name: &'static str, ops: Vec<DataOperation>, outcome: Outcome) -> Arc<Self> {
            Arc::new(Self {
                name,
                ops,
                outcome,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DataVendor for ScriptedVendor {
        fn name(&self) -> &str {
            self.name
        }

        fn supports(&self, operation: DataOperation) -> bool {
            self.ops.contains(&operation)
        }

        async fn fetch(&self, _operation: DataOperation, _args: &serde_json::Value) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                Outcome::Ok(s) => Ok((*s).to_string()),
                Outcome::RateLimited => Err(VendorError::RateLimited {
                    vendor: self.name.to_string(),
                }),
                Outcome::Fails | Outcome::Multi(_) => Err(VendorError::Failed {
                    vendor: self.name.to_string(),
                    message: "scripted failure".to_string(),
                }),
            }
        }

        async fn fetch_all(
            &self,
            operation: DataOperation,
            args: &serde_json::Value,
        ) -> Vec<Result<String>> {
            if let Outcome::Multi(feeds) = &self.outcome {
                self.calls.fetch_add(1, Ordering::SeqCst);
                return feeds
                    .iter()
                    .map(|feed| match feed {
                        Ok(s) => Ok((*s).to_string()),
                        Err(m) => Err(VendorError::Failed {
                            vendor: self.name.to_string(),
                            message: (*m).to_string(),
                        }),
                    })
                    .collect();
            }
            vec![self.fetch(operation, args).await]
        }
    }

    const OP: DataOperation = DataOperation::GetStockData;

    fn args() -> serde_json::Value {
        serde_json::json!({"symbol": "AAPL"})
    }

    #[test]
    fn test_unknown_configured_vendor_is_fatal() {
        let registry = VendorRegistry::new()
            .with_vendor(ScriptedVendor::new("yfinance", vec![OP], Outcome::Ok("x")));
        let config =
            VendorConfig::default().with_category(OperationCategory::CoreStockApis, "bloomberg");
        let err = VendorRouter::new(config, registry).err();
        assert!(matches!(err, Some(VendorError::UnknownVendor(name)) if name == "bloomberg"));
    }

    #[tokio::test]
    async fn test_single_primary_success_stops_immediately() {
        let primary = ScriptedVendor::new("yfinance", vec![OP], Outcome::Ok("prices"));
        let fallback = ScriptedVendor::new("local", vec![OP], Outcome::Ok("other"));
        let registry = VendorRegistry::new()
            .with_vendor(primary.clone())
            .with_vendor(fallback.clone());
        let config =
            VendorConfig::default().with_category(OperationCategory::CoreStockApis, "yfinance");
        let router = VendorRouter::new(config, registry).unwrap();

        let result = router.execute(OP, &args()).await.unwrap();
        assert_eq!(result, "prices");
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_rate_limited_primary_falls_back() {
        let primary = ScriptedVendor::new("alpha_vantage", vec![OP], Outcome::RateLimited);
        let fallback = ScriptedVendor::new("yfinance", vec![OP], Outcome::Ok("fallback data"));
        let registry = VendorRegistry::new()
            .with_vendor(primary.clone())
            .with_vendor(fallback.clone());
        let config = VendorConfig::default()
            .with_category(OperationCategory::CoreStockApis, "alpha_vantage");
        let router = VendorRouter::new(config, registry).unwrap();

        let result = router.execute(OP, &args()).await.unwrap();
        // Fallback result is returned unmodified.
        assert_eq!(result, "fallback data");
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_raises_all_vendors_failed() {
        let a = ScriptedVendor::new("alpha_vantage", vec![OP], Outcome::RateLimited);
        let b = ScriptedVendor::new("yfinance", vec![OP], Outcome::Fails);
        let registry = VendorRegistry::new().with_vendor(a).with_vendor(b);
        let router = VendorRouter::new(VendorConfig::default(), registry).unwrap();

        let err = router.execute(OP, &args()).await.err();
        match err {
            Some(VendorError::AllVendorsFailed {
                operation,
                attempts,
            }) => {
                assert_eq!(operation, OP);
                assert_eq!(attempts, 2);
            }
            other => panic!("expected AllVendorsFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_multi_primary_aggregates_with_newlines() {
        let a = ScriptedVendor::new("alpha_vantage", vec![OP], Outcome::Ok("from av"));
        let b = ScriptedVendor::new("yfinance", vec![OP], Outcome::Ok("from yf"));
        let c = ScriptedVendor::new("local", vec![OP], Outcome::Ok("from local"));
        let registry = VendorRegistry::new()
            .with_vendor(a.clone())
            .with_vendor(b.clone())
            .with_vendor(c.clone());
        let config = VendorConfig::default()
            .with_category(OperationCategory::CoreStockApis, "alpha_vantage,yfinance");
        let router = VendorRouter::new(config, registry).unwrap();

        let result = router.execute(OP, &args()).await.unwrap();
        // Multi-primary configurations keep collecting down the whole
        // chain, so the unconfigured implementor contributes too.
        assert_eq!(result, "from av\nfrom yf\nfrom local");
    }

    #[tokio::test]
    async fn test_vendor_with_multiple_feeds_batches_successes() {
        let multi = ScriptedVendor::new(
            "local",
            vec![DataOperation::GetNews],
            Outcome::Multi(vec![Ok("finnhub news"), Err("reddit down"), Ok("google news")]),
        );
        let registry = VendorRegistry::new().with_vendor(multi.clone());
        let config = VendorConfig::default().with_category(OperationCategory::NewsData, "local");
        let router = VendorRouter::new(config, registry).unwrap();

        let result = router
            .execute(DataOperation::GetNews, &args())
            .await
            .unwrap();
        assert_eq!(result, "finnhub news\ngoogle news");
        assert_eq!(multi.calls(), 1);
    }

    #[tokio::test]
    async fn test_primary_without_support_is_skipped() {
        let news_only = ScriptedVendor::new(
            "google",
            vec![DataOperation::GetNews],
            Outcome::Ok("news"),
        );
        let prices = ScriptedVendor::new("yfinance", vec![OP], Outcome::Ok("prices"));
        let registry = VendorRegistry::new()
            .with_vendor(news_only.clone())
            .with_vendor(prices.clone());
        // google is configured for the category but does not implement
        // price history.
        let config =
            VendorConfig::default().with_category(OperationCategory::CoreStockApis, "google");
        let router = VendorRouter::new(config, registry).unwrap();

        let result = router.execute(OP, &args()).await.unwrap();
        assert_eq!(result, "prices");
        assert_eq!(news_only.calls(), 0);
    }
}
