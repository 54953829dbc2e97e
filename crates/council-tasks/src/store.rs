//! Task record storage

use crate::task::TaskRecord;
use std::collections::HashMap;
use std::sync::Mutex;

/// Storage seam for task records.
///
/// The default store is in-memory; a durable implementation can back
/// the same trait. All operations are whole-record or closure-based so
/// implementations control their own locking.
pub trait TaskStore: Send + Sync {
    /// Insert a new record, replacing any record with the same id
    fn insert(&self, record: TaskRecord);

    /// Snapshot of one record
    fn get(&self, task_id: &str) -> Option<TaskRecord>;

    /// Apply a mutation to the record in place. Returns false when the
    /// id is unknown.
    fn update(&self, task_id: &str, mutate: &mut dyn FnMut(&mut TaskRecord)) -> bool;

    /// Remove one record, returning it if present
    fn remove(&self, task_id: &str) -> Option<TaskRecord>;

    /// Ids of all stored records, in no particular order
    fn ids(&self) -> Vec<String>;
}

/// Process-local store backed by a mutexed map.
///
/// Records do not survive a restart. The lock is held only for the
/// map operation itself.
#[derive(Default)]
pub struct InMemoryTaskStore {
    records: Mutex<HashMap<String, TaskRecord>>,
}

impl InMemoryTaskStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> std::sync::MutexGuard<'_, HashMap<String, TaskRecord>> {
        match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl TaskStore for InMemoryTaskStore {
    fn insert(&self, record: TaskRecord) {
        self.locked().insert(record.task_id.clone(), record);
    }

    fn get(&self, task_id: &str) -> Option<TaskRecord> {
        self.locked().get(task_id).cloned()
    }

    fn update(&self, task_id: &str, mutate: &mut dyn FnMut(&mut TaskRecord)) -> bool {
        match self.locked().get_mut(task_id) {
            Some(record) => {
                mutate(record);
                true
            }
            None => false,
        }
    }

    fn remove(&self, task_id: &str) -> Option<TaskRecord> {
        self.locked().remove(task_id)
    }

    fn ids(&self) -> Vec<String> {
        self.locked().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let store = InMemoryTaskStore::new();
        store.insert(TaskRecord::new("a".to_string()));

        assert!(store.get("a").is_some());
        assert!(store.get("b").is_none());
        assert_eq!(store.ids(), vec!["a".to_string()]);

        let removed = store.remove("a");
        assert!(removed.is_some());
        assert!(store.get("a").is_none());
    }

    #[test]
    fn test_update_unknown_id_reports_false() {
        let store = InMemoryTaskStore::new();
        let touched = store.update("missing", &mut |record| {
            record.progress = Some("half".to_string());
        });
        assert!(!touched);
    }

    #[test]
    fn test_update_mutates_in_place() {
        let store = InMemoryTaskStore::new();
        store.insert(TaskRecord::new("a".to_string()));

        let touched = store.update("a", &mut |record| {
            record.progress = Some("half".to_string());
        });
        assert!(touched);
        assert_eq!(store.get("a").unwrap().progress.as_deref(), Some("half"));
    }
}
