//! Tracing setup for pipeline runs

use crate::error::{CoreError, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber for a pipeline process.
///
/// Filtering comes from `RUST_LOG` when set, otherwise from
/// `default_filter` (e.g. `"info"` or `"council_graph=debug"`).
/// Fails when a subscriber is already installed, so callers in tests
/// can ignore the result and share one subscriber.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .map_err(|e| CoreError::Config(format!("tracing init failed: {e}")))
}
