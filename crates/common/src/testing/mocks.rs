//! Mock storage backends

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::storage::{KeyValueStore, MemoryStore, StorageError, StorageResult};

/// One call observed by a [`FaultyStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Get(String),
    Set(String),
    Remove(String),
}

/// [`MemoryStore`] wrapper that records every call and fails on demand.
///
/// Clones share state, like [`MemoryStore`].
#[derive(Debug, Clone, Default)]
pub struct FaultyStore {
    inner: MemoryStore,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    failing_reads: Arc<Mutex<HashSet<String>>>,
    failing_writes: Arc<Mutex<HashSet<String>>>,
    failing_removals: Arc<Mutex<HashSet<String>>>,
}

impl FaultyStore {
    /// Create an empty store with no failures configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing memory store.
    #[must_use]
    pub fn wrapping(inner: MemoryStore) -> Self {
        Self { inner, ..Self::default() }
    }

    /// Underlying store, for seeding and assertions.
    #[must_use]
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn fail_read_of(&self, key: &str) {
        self.failing_reads.lock().insert(key.to_string());
    }

    pub fn fail_write_of(&self, key: &str) {
        self.failing_writes.lock().insert(key.to_string());
    }

    pub fn fail_removal_of(&self, key: &str) {
        self.failing_removals.lock().insert(key.to_string());
    }

    /// Stop injecting failures.
    pub fn heal(&self) {
        self.failing_reads.lock().clear();
        self.failing_writes.lock().clear();
        self.failing_removals.lock().clear();
    }

    /// Calls observed so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    /// Keys passed to `remove`, in order.
    #[must_use]
    pub fn removed_keys(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                StoreCall::Remove(key) => Some(key.clone()),
                _ => None,
            })
            .collect()
    }

    fn injected(key: &str, op: &str) -> StorageError {
        StorageError::Unavailable(format!("injected {op} failure for {key}"))
    }
}

#[async_trait]
impl KeyValueStore for FaultyStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.calls.lock().push(StoreCall::Get(key.to_string()));
        if self.failing_reads.lock().contains(key) {
            return Err(Self::injected(key, "read"));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.calls.lock().push(StoreCall::Set(key.to_string()));
        if self.failing_writes.lock().contains(key) {
            return Err(Self::injected(key, "write"));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.calls.lock().push(StoreCall::Remove(key.to_string()));
        if self.failing_removals.lock().contains(key) {
            return Err(Self::injected(key, "remove"));
        }
        self.inner.remove(key).await
    }

    fn backend_name(&self) -> &'static str {
        "faulty"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_and_injects_failures() {
        let store = FaultyStore::new();
        store.set("user", "{}").await.unwrap();
        store.fail_removal_of("user");

        assert!(store.remove("user").await.is_err());
        assert!(store.inner().contains("user"));

        store.heal();
        store.remove("user").await.unwrap();
        assert_eq!(
            store.calls(),
            vec![
                StoreCall::Set("user".into()),
                StoreCall::Remove("user".into()),
                StoreCall::Remove("user".into()),
            ]
        );
        assert_eq!(store.removed_keys(), vec!["user".to_string(), "user".to_string()]);
    }
}
