//! Core storage trait definitions

use async_trait::async_trait;

use super::error::StorageResult;

/// Asynchronous string key-value store
///
/// Implementations must be safe to share between tasks. Removing a key that
/// does not exist is not an error.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` when absent.
    ///
    /// # Errors
    /// Returns error if the backend cannot be read
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns error if the backend rejects the write
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key` (idempotent).
    ///
    /// # Errors
    /// Returns error if the backend cannot be written
    async fn remove(&self, key: &str) -> StorageResult<()>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}
