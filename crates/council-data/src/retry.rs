//! Retry logic with exponential backoff
//!
//! Generic bounded-retry wrapper used around vendor calls. The caller
//! decides which errors are recoverable; non-recoverable errors
//! propagate immediately without retrying.

use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry policy configuration
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,

    /// Backoff base: wait `backoff_base^(attempt-1)` seconds before
    /// attempt `attempt + 1`
    pub backoff_base: f64,

    /// Cap on any single backoff sleep
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: 2.0,
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_base: f64, max_backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff_base,
            max_backoff,
        }
    }

    /// A policy that never retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            backoff_base: 1.0,
            max_backoff: Duration::from_secs(0),
        }
    }

    /// Fast retries for tests
    pub fn fast() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: 0.001,
            max_backoff: Duration::from_millis(10),
        }
    }

    /// Backoff before the retry following failed attempt `attempt`
    /// (1-based): `backoff_base^(attempt-1)` seconds, capped.
    fn backoff_duration(&self, attempt: u32) -> Duration {
        let secs = self.backoff_base.powi(attempt.saturating_sub(1) as i32);
        let backoff = Duration::from_secs_f64(secs.max(0.0));
        backoff.min(self.max_backoff)
    }

    /// Execute an async operation with bounded retry.
    ///
    /// `is_recoverable` classifies errors; a non-recoverable error is
    /// propagated immediately. The final attempt's error is propagated
    /// unchanged. `on_retry` is invoked once per retry with the
    /// attempt number and the error that caused it.
    pub async fn execute<F, Fut, T, E>(
        &self,
        operation_name: &str,
        mut operation: F,
        is_recoverable: impl Fn(&E) -> bool,
        mut on_retry: Option<&mut dyn FnMut(u32, &E)>,
    ) -> std::result::Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!(
                "Attempt {}/{} for operation: {}",
                attempt, self.max_attempts, operation_name
            );

            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!(
                            "Operation '{}' succeeded after {} retries",
                            operation_name,
                            attempt - 1
                        );
                    }
                    return Ok(result);
                }
                Err(e) => {
                    if !is_recoverable(&e) {
                        debug!(
                            "Operation '{}' failed with non-recoverable error: {}",
                            operation_name, e
                        );
                        return Err(e);
                    }
                    if attempt >= self.max_attempts {
                        warn!(
                            "Operation '{}' failed after {} attempts: {}",
                            operation_name, self.max_attempts, e
                        );
                        return Err(e);
                    }

                    let backoff = self.backoff_duration(attempt);
                    warn!(
                        "Operation '{}' failed (attempt {}/{}): {}. Retrying in {:?}",
                        operation_name, attempt, self.max_attempts, e, backoff
                    );
                    if let Some(callback) = on_retry.as_deref_mut() {
                        callback(attempt, &e);
                    }
                    sleep(backoff).await;
                }
            }
        }
    }
}
