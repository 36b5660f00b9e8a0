//! Keychain-backed key-value store
//!
//! Thin wrapper over the platform keychain (macOS Keychain Access, Windows
//! Credential Manager, Linux Secret Service). Each logical key becomes one
//! keychain entry under the provider's service name.
//!
//! ## Usage
//!
//! ```no_run
//! use wildwelcome_common::security::KeychainProvider;
//!
//! let keychain = KeychainProvider::new("WildWelcome.session");
//! keychain.set_secret("accessToken", "eyJ...")?;
//! let token = keychain.get_secret("accessToken")?;
//! # Ok::<(), wildwelcome_common::security::KeychainError>(())
//! ```

use async_trait::async_trait;
use keyring::Entry;
use thiserror::Error;
use tracing::debug;

use crate::storage::{KeyValueStore, StorageError, StorageResult};

/// Keychain errors
#[derive(Debug, Error)]
pub enum KeychainError {
    #[error("Secret not found in keychain")]
    NotFound,

    #[error("Keychain access failed: {0}")]
    AccessFailed(String),
}

impl From<KeychainError> for StorageError {
    fn from(err: KeychainError) -> Self {
        Self::Keychain(err.to_string())
    }
}

/// Platform keychain provider for one service namespace
#[derive(Debug, Clone)]
pub struct KeychainProvider {
    service_name: String,
}

impl KeychainProvider {
    /// Create a provider for `service_name` (e.g. `"WildWelcome.session"`).
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into() }
    }

    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Store a secret value in the platform keychain
    ///
    /// # Errors
    /// Returns `KeychainError::AccessFailed` if keychain access fails
    pub fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        debug!(service = %self.service_name, key = %key, "Storing secret in keychain");

        let entry = self.create_entry(key)?;
        entry.set_password(value).map_err(|e| {
            KeychainError::AccessFailed(format!("Failed to store secret for {key}: {e}"))
        })
    }

    /// Retrieve a secret value from the platform keychain
    ///
    /// # Errors
    /// Returns `KeychainError::NotFound` if the secret doesn't exist and
    /// `KeychainError::AccessFailed` if keychain access fails
    pub fn get_secret(&self, key: &str) -> Result<String, KeychainError> {
        debug!(service = %self.service_name, key = %key, "Retrieving secret from keychain");

        let entry = self.create_entry(key)?;
        entry.get_password().map_err(|e| match e {
            keyring::Error::NoEntry => KeychainError::NotFound,
            other => {
                KeychainError::AccessFailed(format!("Failed to retrieve secret for {key}: {other}"))
            }
        })
    }

    /// Delete a secret from the platform keychain (idempotent)
    ///
    /// # Errors
    /// Returns `KeychainError::AccessFailed` if keychain access fails
    pub fn delete_secret(&self, key: &str) -> Result<(), KeychainError> {
        debug!(service = %self.service_name, key = %key, "Deleting secret from keychain");

        let entry = self.create_entry(key)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(KeychainError::AccessFailed(format!(
                "Failed to delete secret for {key}: {e}"
            ))),
        }
    }

    /// Check if a secret exists in the keychain
    #[must_use]
    pub fn secret_exists(&self, key: &str) -> bool {
        self.get_secret(key).is_ok()
    }

    fn create_entry(&self, key: &str) -> Result<Entry, KeychainError> {
        Entry::new(&self.service_name, key).map_err(|e| {
            KeychainError::AccessFailed(format!("Failed to open keychain entry {key}: {e}"))
        })
    }

    /// Runs a blocking keychain call off the async executor.
    async fn run_blocking<T, F>(&self, op: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(Self) -> Result<T, KeychainError> + Send + 'static,
    {
        let provider = self.clone();
        tokio::task::spawn_blocking(move || op(provider))
            .await
            .map_err(|e| StorageError::Unavailable(format!("Keychain task failed: {e}")))?
            .map_err(StorageError::from)
    }
}

#[async_trait]
impl KeyValueStore for KeychainProvider {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let key = key.to_string();
        self.run_blocking(move |provider| match provider.get_secret(&key) {
            Ok(value) => Ok(Some(value)),
            Err(KeychainError::NotFound) => Ok(None),
            Err(e) => Err(e),
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let (key, value) = (key.to_string(), value.to_string());
        self.run_blocking(move |provider| provider.set_secret(&key, &value)).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let key = key.to_string();
        self.run_blocking(move |provider| provider.delete_secret(&key)).await
    }

    fn backend_name(&self) -> &'static str {
        "keychain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keychain_errors_convert_to_storage_errors() {
        let err: StorageError = KeychainError::AccessFailed("locked".into()).into();
        assert!(matches!(err, StorageError::Keychain(ref msg) if msg.contains("locked")));
    }

    #[test]
    fn provider_keeps_service_name() {
        let provider = KeychainProvider::new("WildWelcome.test");
        assert_eq!(provider.service_name(), "WildWelcome.test");
        assert_eq!(provider.backend_name(), "keychain");
    }

    #[test]
    #[ignore = "requires platform keychain access"]
    fn round_trips_through_platform_keychain() {
        let provider = KeychainProvider::new("WildWelcome.test");
        provider.set_secret("probe", "value").unwrap();
        assert_eq!(provider.get_secret("probe").unwrap(), "value");
        provider.delete_secret("probe").unwrap();
        assert!(!provider.secret_exists("probe"));
    }
}
