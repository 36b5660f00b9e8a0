//! Application wiring
//!
//! Turns a [`Config`] into a ready-to-use session manager and route guard.
//! This is the only place in the workspace that picks concrete adapters.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use wildwelcome_common::storage::{KeyValueStore, MemoryStore};
use wildwelcome_core::{Navigator, RouteGuard, RouteTable, SessionManager, SessionStore};
use wildwelcome_domain::{Config, SessionSnapshot, StorageBackend, StorageConfig};

use crate::api::HttpAuthApi;
use crate::config;
use crate::observability::init_tracing;
use crate::storage::FileStore;

/// Everything a front end needs to drive the session
pub struct AppContext {
    pub config: Config,
    pub session: Arc<SessionManager>,
    pub guard: RouteGuard,
    /// State after startup resolution.
    pub initial: SessionSnapshot,
}

/// Build the persistence backend selected by `config.backend`.
///
/// # Errors
/// Fails for the keychain backend when the `keychain` feature is disabled.
pub fn build_storage(config: &StorageConfig) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.backend {
        StorageBackend::File => Arc::new(FileStore::new(PathBuf::from(&config.path))),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::Keychain => keychain_store(config)?,
    };
    info!(backend = store.backend_name(), "Session storage ready");
    Ok(store)
}

#[cfg(feature = "keychain")]
fn keychain_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    Ok(Arc::new(wildwelcome_common::security::KeychainProvider::new(config.service_name.clone())))
}

#[cfg(not(feature = "keychain"))]
fn keychain_store(_config: &StorageConfig) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    anyhow::bail!("keychain storage requires the `keychain` feature of wildwelcome-infra")
}

/// Wire adapters for `config` and resolve the persisted session.
///
/// # Errors
/// Returns an error if the storage backend or HTTP client cannot be built.
pub async fn bootstrap(config: Config, navigator: Arc<dyn Navigator>) -> anyhow::Result<AppContext> {
    let backend = build_storage(&config.storage).context("failed to set up session storage")?;
    let api = HttpAuthApi::new(&config.api).context("failed to set up API client")?;

    let session =
        Arc::new(SessionManager::new(Arc::new(api), SessionStore::new(backend), navigator));
    let guard = RouteGuard::new(session.clone(), RouteTable::wild_welcome());
    let initial = session.initialize().await;

    info!(
        phase = %initial.phase,
        authenticated = initial.is_authenticated(),
        "Session bootstrap complete"
    );

    Ok(AppContext { config, session, guard, initial })
}

/// Load configuration, install tracing, then [`bootstrap`].
///
/// # Errors
/// Returns an error if configuration is invalid or wiring fails.
pub async fn bootstrap_from_env(navigator: Arc<dyn Navigator>) -> anyhow::Result<AppContext> {
    let config = config::load().context("failed to load configuration")?;
    init_tracing(&config.logging);
    bootstrap(config, navigator).await
}
