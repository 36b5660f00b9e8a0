//! Config loader integration tests
//!
//! File-based loading end to end: format detection, defaults for missing
//! sections, env overlay on top of a file, and validation of the result.

use std::path::PathBuf;

use wildwelcome_domain::{Config, StorageBackend, WelcomeError};
use wildwelcome_infra::config::{
    apply_env_overrides_from, load_from_file, probe_config_paths_from, validate,
};

fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Validates a JSON file is loaded with unspecified sections defaulted.
///
/// # Test Steps
/// 1. Write a JSON file with only the `api` section
/// 2. Load it
/// 3. Verify overrides applied and other sections default
#[test]
fn test_load_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "wildwelcome.json",
        r#"{"api": {"base_url": "https://api.wildwelcome.test", "timeout_secs": 4}}"#,
    );

    let config = load_from_file(Some(path)).unwrap();

    assert_eq!(config.api.base_url, "https://api.wildwelcome.test");
    assert_eq!(config.api.timeout_secs, 4);
    assert_eq!(config.storage, Config::default().storage);
    assert!(validate(&config).is_ok());
}

#[test]
fn test_load_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "config.toml",
        r#"
[api]
base_url = "http://127.0.0.1:9000/api"

[storage]
backend = "memory"

[logging]
filter = "wildwelcome_core=debug"
json = true
"#,
    );

    let config = load_from_file(Some(path)).unwrap();

    assert_eq!(config.api.base_url, "http://127.0.0.1:9000/api");
    assert_eq!(config.api.timeout_secs, 10);
    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.logging.filter, "wildwelcome_core=debug");
    assert!(config.logging.json);
}

#[test]
fn test_missing_file_is_config_error() {
    let result = load_from_file(Some(PathBuf::from("/nonexistent/wildwelcome.json")));
    assert!(matches!(result, Err(WelcomeError::Config(_))));
}

#[test]
fn test_invalid_json_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "wildwelcome.json", r#"{ "api": "#);

    let err = load_from_file(Some(path)).unwrap_err();
    assert!(matches!(err, WelcomeError::Config(ref msg) if msg.contains("Invalid JSON")));
}

#[test]
fn test_unknown_backend_in_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "wildwelcome.toml", "[storage]\nbackend = \"sqlite\"\n");

    assert!(matches!(load_from_file(Some(path)), Err(WelcomeError::Config(_))));
}

/// Validates environment values win over file values.
///
/// # Test Steps
/// 1. Load a file that sets the API URL and log filter
/// 2. Overlay an environment that sets only the API URL
/// 3. Verify the URL comes from env and the filter from the file
#[test]
fn test_env_overrides_file_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "wildwelcome.json",
        r#"{"api": {"base_url": "https://file.example.com"}, "logging": {"filter": "warn"}}"#,
    );
    let from_file = load_from_file(Some(path)).unwrap();

    let config = apply_env_overrides_from(from_file, |key| {
        (key == "WILDWELCOME_API_URL").then(|| "https://env.example.com".to_string())
    })
    .unwrap();

    assert_eq!(config.api.base_url, "https://env.example.com");
    assert_eq!(config.logging.filter, "warn");
}

#[test]
fn test_probe_finds_file_written_in_parent() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("workspace");
    std::fs::create_dir(&nested).unwrap();
    let path = write(&dir, "wildwelcome.toml", "[api]\ntimeout_secs = 3\n");

    let found = probe_config_paths_from(&nested).unwrap();
    assert_eq!(found, path);
    assert_eq!(load_from_file(Some(found)).unwrap().api.timeout_secs, 3);
}
