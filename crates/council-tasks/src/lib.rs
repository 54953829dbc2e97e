//! Asynchronous task lifecycle manager
//!
//! Tracks long-running analysis tasks through a fire-and-poll model:
//! a caller creates a task, dispatches the work onto the runtime, and
//! polls the task record for status, progress and final result. A
//! background sweeper expires stale records.

pub mod manager;
pub mod store;
pub mod task;

pub use manager::{SweeperHandle, TaskManager};
pub use store::{InMemoryTaskStore, TaskStore};
pub use task::{TaskRecord, TaskStatus};
