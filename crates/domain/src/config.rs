//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_SECS, DEFAULT_KEYCHAIN_SERVICE, DEFAULT_LOG_FILTER,
    DEFAULT_STORAGE_PATH,
};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_API_BASE_URL.to_string(), timeout_secs: DEFAULT_API_TIMEOUT_SECS }
    }
}

/// Where the session record is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Single JSON document on disk.
    #[default]
    File,
    /// Platform keychain entries.
    Keychain,
    /// Process memory only; nothing survives a restart.
    Memory,
}

crate::impl_wire_name_conversions!(StorageBackend {
    File => "file",
    Keychain => "keychain",
    Memory => "memory",
});

/// Session persistence configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Path of the session file for the `file` backend.
    pub path: String,
    /// Keychain service name for the `keychain` backend.
    pub service_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            path: DEFAULT_STORAGE_PATH.to_string(),
            service_name: DEFAULT_KEYCHAIN_SERVICE.to_string(),
        }
    }
}

/// Tracing subscriber configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info,wildwelcome_core=debug`.
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: DEFAULT_LOG_FILTER.to_string(), json: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_api() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"api": {"base_url": "https://api.wildwelcome.test"}}"#)
                .unwrap();
        assert_eq!(config.api.base_url, "https://api.wildwelcome.test");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn storage_backend_parses_case_insensitively() {
        assert_eq!("Keychain".parse::<StorageBackend>(), Ok(StorageBackend::Keychain));
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }
}
