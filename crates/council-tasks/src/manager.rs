//! Task lifecycle manager

use crate::store::TaskStore;
use crate::task::{TaskRecord, TaskStatus};
use chrono::{Duration, Utc};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Tasks older than this are removed by the sweeper
const DEFAULT_EXPIRY_HOURS: i64 = 24;
/// Default period of the background sweep
const DEFAULT_SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60 * 60);

/// Controls a running background sweeper
pub struct SweeperHandle {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stop the sweep loop and wait for it to exit
    pub async fn shutdown(self) {
        let _ = self.stop.send(());
        let _ = self.handle.await;
    }
}

/// Tracks analysis tasks through their lifecycle.
///
/// The manager is an injected service object shared by cloning; it
/// holds no global state. Work is dispatched fire-and-poll: `spawn`
/// hands the future to the runtime and callers observe progress
/// through `get_status` snapshots.
#[derive(Clone)]
pub struct TaskManager {
    store: Arc<dyn TaskStore>,
    expiry: Duration,
}

impl TaskManager {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            expiry: Duration::hours(DEFAULT_EXPIRY_HOURS),
        }
    }

    #[must_use]
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    /// Register a new pending task and return its id. No work starts
    /// until the task is dispatched.
    pub fn create_task(&self) -> String {
        let task_id = uuid::Uuid::new_v4().to_string();
        self.store.insert(TaskRecord::new(task_id.clone()));
        debug!(%task_id, "task created");
        task_id
    }

    /// Move a task to a new status.
    ///
    /// Unknown ids and attempts to leave a terminal state are warned
    /// and ignored.
    pub fn update_status(&self, task_id: &str, status: TaskStatus) {
        let touched = self.store.update(task_id, &mut |record| {
            if record.status.is_terminal() {
                warn!(
                    %task_id,
                    current = %record.status,
                    requested = %status,
                    "refusing to leave a terminal task state"
                );
                return;
            }
            record.status = status;
            record.updated_at = Utc::now();
            if status.is_terminal() {
                record.completed_at = Some(record.updated_at);
            }
        });
        if !touched {
            warn!(%task_id, "status update for unknown task");
        }
    }

    /// Update the free-form progress note
    pub fn update_task_progress(&self, task_id: &str, progress: impl Into<String>) {
        let progress = progress.into();
        let touched = self.store.update(task_id, &mut |record| {
            record.progress = Some(progress.clone());
            record.updated_at = Utc::now();
        });
        if !touched {
            warn!(%task_id, "progress update for unknown task");
        }
    }

    /// Complete a task with its result payload
    pub fn set_result(&self, task_id: &str, result: serde_json::Value) {
        self.finish(task_id, TaskStatus::Completed, Some(result), None);
    }

    /// Fail a task with an error message
    pub fn set_error(&self, task_id: &str, error: impl Into<String>) {
        self.finish(task_id, TaskStatus::Failed, None, Some(error.into()));
    }

    fn finish(
        &self,
        task_id: &str,
        status: TaskStatus,
        result: Option<serde_json::Value>,
        error: Option<String>,
    ) {
        let touched = self.store.update(task_id, &mut |record| {
            if record.status.is_terminal() {
                return;
            }
            record.status = status;
            record.result = result.clone();
            record.error = error.clone();
            record.updated_at = Utc::now();
            record.completed_at = Some(record.updated_at);
        });
        if !touched {
            warn!(%task_id, "completion for unknown task");
        }
    }

    /// Snapshot of one task record
    #[must_use]
    pub fn get_status(&self, task_id: &str) -> Option<TaskRecord> {
        self.store.get(task_id)
    }

    /// Remove one task record
    pub fn delete_task(&self, task_id: &str) -> bool {
        self.store.remove(task_id).is_some()
    }

    /// Ids of all tracked tasks
    #[must_use]
    pub fn task_ids(&self) -> Vec<String> {
        self.store.ids()
    }

    /// Remove tasks older than the expiry window. Idempotent; returns
    /// the number of removed records.
    pub fn sweep_expired(&self) -> usize {
        let cutoff = Utc::now() - self.expiry;
        let mut removed = 0;
        for task_id in self.store.ids() {
            let expired = self
                .store
                .get(&task_id)
                .is_some_and(|record| record.created_at < cutoff);
            if expired && self.store.remove(&task_id).is_some() {
                removed += 1;
            }
        }
        if removed > 0 {
            info!(removed, "swept expired tasks");
        }
        removed
    }

    /// Dispatch the task's work onto the runtime.
    ///
    /// The task is marked running before the future is polled and
    /// completed/failed from its outcome. Running work is never
    /// cancelled by the manager.
    pub fn spawn<F>(&self, task_id: String, work: F) -> JoinHandle<()>
    where
        F: Future<Output = Result<serde_json::Value, String>> + Send + 'static,
    {
        let manager = self.clone();
        tokio::spawn(async move {
            manager.update_status(&task_id, TaskStatus::Running);
            match work.await {
                Ok(result) => manager.set_result(&task_id, result),
                Err(error) => manager.set_error(&task_id, error),
            }
        })
    }

    /// Run the expiry sweep on a fixed interval until shut down
    pub fn start_sweeper(&self, period: Option<std::time::Duration>) -> SweeperHandle {
        let manager = self.clone();
        let period = period.unwrap_or(DEFAULT_SWEEP_INTERVAL);
        let (stop, mut stopped) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        manager.sweep_expired();
                    }
                    _ = &mut stopped => {
                        debug!("task sweeper shutting down");
                        break;
                    }
                }
            }
        });
        SweeperHandle { stop, handle }
    }
}
