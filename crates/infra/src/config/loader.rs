//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Read `.env` from the working directory if present (`dotenvy`)
//! 2. Probe for a config file; start from built-in defaults if none exists
//! 3. Apply environment variable overrides
//! 4. Validate the result
//!
//! Environment variables win over the file, the file wins over defaults.
//!
//! ## Environment Variables
//! - `WILDWELCOME_API_URL`: API base URL
//! - `WILDWELCOME_API_TIMEOUT_SECS`: Request timeout in seconds
//! - `WILDWELCOME_STORAGE_BACKEND`: `file`, `keychain` or `memory`
//! - `WILDWELCOME_STORAGE_PATH`: Session file path for the file backend
//! - `WILDWELCOME_LOG_FILTER`: `EnvFilter` directive
//! - `WILDWELCOME_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! `wildwelcome.{json,toml}` then `config.{json,toml}`, looked up in the
//! working directory and then up to two parent directories.

use std::path::{Path, PathBuf};

use url::Url;
use wildwelcome_domain::{Config, Result, StorageBackend, WelcomeError};

pub const ENV_API_URL: &str = "WILDWELCOME_API_URL";
pub const ENV_API_TIMEOUT_SECS: &str = "WILDWELCOME_API_TIMEOUT_SECS";
pub const ENV_STORAGE_BACKEND: &str = "WILDWELCOME_STORAGE_BACKEND";
pub const ENV_STORAGE_PATH: &str = "WILDWELCOME_STORAGE_PATH";
pub const ENV_LOG_FILTER: &str = "WILDWELCOME_LOG_FILTER";
pub const ENV_LOG_JSON: &str = "WILDWELCOME_LOG_JSON";

const CONFIG_FILE_NAMES: [&str; 4] =
    ["wildwelcome.json", "wildwelcome.toml", "config.json", "config.toml"];
const PARENT_LEVELS: usize = 2;

/// Load configuration from file, environment and defaults
///
/// # Errors
/// Returns `WelcomeError::Config` if the config file cannot be parsed, an
/// environment variable holds an invalid value, or the merged result fails
/// [`validate`].
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    let base = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, using defaults");
            Config::default()
        }
    };

    let config = apply_env_overrides_from(base, |key| std::env::var(key).ok())?;
    validate(&config)?;
    tracing::info!(
        api = %config.api.base_url,
        storage = %config.storage.backend,
        "Configuration loaded"
    );
    Ok(config)
}

/// Load configuration from environment variables over built-in defaults
///
/// No config file is consulted.
///
/// # Errors
/// Returns `WelcomeError::Config` if a variable holds an invalid value.
pub fn load_from_env() -> Result<Config> {
    let config = apply_env_overrides_from(Config::default(), |key| std::env::var(key).ok())?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Missing sections and
/// fields fall back to their defaults.
///
/// # Errors
/// Returns `WelcomeError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(WelcomeError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            WelcomeError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| WelcomeError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration text, format chosen by file extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| WelcomeError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| WelcomeError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(WelcomeError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First config file found from the current working directory upwards.
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    probe_config_paths_from(&cwd)
}

/// First config file found in `start` or up to two of its ancestors.
///
/// Within one directory `wildwelcome.*` is preferred over `config.*`.
pub fn probe_config_paths_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .take(PARENT_LEVELS + 1)
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

/// Overlay environment values onto `config`
///
/// `lookup` resolves a variable name to its value. Blank values are treated
/// as unset.
///
/// # Errors
/// Returns `WelcomeError::Config` for unparseable numbers or backends.
pub fn apply_env_overrides_from<F>(mut config: Config, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(url) = get(ENV_API_URL) {
        config.api.base_url = url;
    }
    if let Some(raw) = get(ENV_API_TIMEOUT_SECS) {
        config.api.timeout_secs = raw.parse::<u64>().map_err(|e| {
            WelcomeError::Config(format!("Invalid {ENV_API_TIMEOUT_SECS} '{raw}': {e}"))
        })?;
    }
    if let Some(raw) = get(ENV_STORAGE_BACKEND) {
        config.storage.backend = raw
            .parse::<StorageBackend>()
            .map_err(|e| WelcomeError::Config(format!("Invalid {ENV_STORAGE_BACKEND}: {e}")))?;
    }
    if let Some(path) = get(ENV_STORAGE_PATH) {
        config.storage.path = path;
    }
    if let Some(filter) = get(ENV_LOG_FILTER) {
        config.logging.filter = filter;
    }
    if let Some(raw) = get(ENV_LOG_JSON) {
        config.logging.json = parse_bool(&raw);
    }

    Ok(config)
}

/// Check the merged configuration.
///
/// # Errors
/// Returns `WelcomeError::Config` if the API URL is not an absolute http(s)
/// URL, the timeout is zero, or the file backend has no path.
pub fn validate(config: &Config) -> Result<()> {
    let url = Url::parse(&config.api.base_url).map_err(|e| {
        WelcomeError::Config(format!("Invalid API base URL '{}': {e}", config.api.base_url))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(WelcomeError::Config(format!(
            "API base URL must use http or https, got '{}'",
            url.scheme()
        )));
    }
    if config.api.timeout_secs == 0 {
        return Err(WelcomeError::Config("API timeout must be at least one second".to_string()));
    }
    if config.storage.backend == StorageBackend::File && config.storage.path.trim().is_empty() {
        return Err(WelcomeError::Config("File storage requires a path".to_string()));
    }
    Ok(())
}

/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn parse_bool(raw: &str) -> bool {
    matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use wildwelcome_domain::{ApiConfig, LoggingConfig};

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_bool_parsing() {
        for truthy in ["1", "true", "YES", "On"] {
            assert!(parse_bool(truthy), "{truthy} should be true");
        }
        for falsy in ["0", "false", "no", "off", "maybe"] {
            assert!(!parse_bool(falsy), "{falsy} should be false");
        }
    }

    #[test]
    fn test_env_overrides_every_field() {
        let config = apply_env_overrides_from(
            Config::default(),
            env(&[
                (ENV_API_URL, "https://api.wildwelcome.test"),
                (ENV_API_TIMEOUT_SECS, "25"),
                (ENV_STORAGE_BACKEND, "memory"),
                (ENV_STORAGE_PATH, "/tmp/ww.json"),
                (ENV_LOG_FILTER, "debug"),
                (ENV_LOG_JSON, "true"),
            ]),
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://api.wildwelcome.test");
        assert_eq!(config.api.timeout_secs, 25);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.path, "/tmp/ww.json");
        assert_eq!(config.logging.filter, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let config = apply_env_overrides_from(
            Config::default(),
            env(&[(ENV_API_URL, "   "), (ENV_API_TIMEOUT_SECS, "")]),
        )
        .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_timeout_is_config_error() {
        let err = apply_env_overrides_from(
            Config::default(),
            env(&[(ENV_API_TIMEOUT_SECS, "soon")]),
        )
        .unwrap_err();
        assert!(matches!(err, WelcomeError::Config(ref msg) if msg.contains(ENV_API_TIMEOUT_SECS)));
    }

    #[test]
    fn test_unknown_backend_is_config_error() {
        let result =
            apply_env_overrides_from(Config::default(), env(&[(ENV_STORAGE_BACKEND, "sqlite")]));
        assert!(matches!(result, Err(WelcomeError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.api.base_url = "localhost:8000".to_string();
        assert!(validate(&config).is_err(), "scheme-less URL should fail");

        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert!(validate(&config).is_err(), "zero timeout should fail");

        let mut config = Config::default();
        config.storage.path = String::new();
        assert!(validate(&config).is_err(), "file backend without path should fail");

        config.storage.backend = StorageBackend::Memory;
        assert!(validate(&config).is_ok(), "memory backend does not need a path");
    }

    #[test]
    fn test_parse_config_json() {
        let config = parse_config(
            r#"{"api": {"base_url": "https://api.example.com", "timeout_secs": 5}}"#,
            Path::new("wildwelcome.json"),
        )
        .unwrap();
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_content = r#"
[storage]
backend = "keychain"
service_name = "WildWelcome.test"

[logging]
json = true
"#;
        let config = parse_config(toml_content, Path::new("config.toml")).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Keychain);
        assert_eq!(config.storage.service_name, "WildWelcome.test");
        assert!(config.logging.json);
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("api: {}", Path::new("config.yaml"));
        assert!(matches!(result, Err(WelcomeError::Config(_))));
    }

    #[test]
    fn test_probe_prefers_named_file_in_nearest_directory() {
        let root = tempfile::tempdir().unwrap();
        let child = root.path().join("app");
        std::fs::create_dir(&child).unwrap();
        std::fs::write(root.path().join("wildwelcome.toml"), "").unwrap();
        std::fs::write(child.join("config.json"), "{}").unwrap();

        assert_eq!(probe_config_paths_from(&child), Some(child.join("config.json")));

        std::fs::write(child.join("wildwelcome.json"), "{}").unwrap();
        assert_eq!(probe_config_paths_from(&child), Some(child.join("wildwelcome.json")));
    }

    #[test]
    fn test_probe_walks_up_to_two_parents() {
        let root = tempfile::tempdir().unwrap();
        let deep = root.path().join("a").join("b").join("c");
        std::fs::create_dir_all(&deep).unwrap();
        std::fs::write(root.path().join("a").join("config.toml"), "").unwrap();

        assert_eq!(
            probe_config_paths_from(&deep),
            Some(root.path().join("a").join("config.toml"))
        );

        let deeper = deep.join("d");
        std::fs::create_dir(&deeper).unwrap();
        assert_eq!(probe_config_paths_from(&deeper), None);
    }
}
