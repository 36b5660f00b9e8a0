//! JSON file key-value store
//!
//! All entries live in a single JSON object. Every write replaces the file
//! through a temp file in the same directory followed by a rename, so a
//! crash mid-write leaves either the old or the new contents on disk.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use wildwelcome_common::storage::{KeyValueStore, StorageError, StorageResult};

type Entries = BTreeMap<String, String>;

/// File-backed [`KeyValueStore`]
///
/// Clones share the same write lock. Two `FileStore`s pointed at the same
/// path from one process are not coordinated.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: Arc::new(path.into()), lock: Arc::new(Mutex::new(())) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> StorageResult<Entries> {
        let path = Arc::clone(&self.path);
        run_blocking(move || read_entries(&path)).await
    }

    async fn write_entries(&self, entries: Entries) -> StorageResult<()> {
        let path = Arc::clone(&self.path);
        run_blocking(move || write_entries(&path, &entries)).await
    }
}

async fn run_blocking<T, F>(job: F) -> StorageResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> StorageResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| StorageError::Unavailable(format!("storage task failed: {e}")))?
}

fn read_entries(path: &Path) -> StorageResult<Entries> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
        Err(e) => return Err(e.into()),
    };

    if raw.trim().is_empty() {
        return Ok(Entries::new());
    }

    match serde_json::from_str(&raw) {
        Ok(entries) => Ok(entries),
        Err(e) => {
            // Unreadable contents are dropped on the next write
            warn!(path = %path.display(), error = %e, "Session file is corrupt, ignoring it");
            Ok(Entries::new())
        }
    }
}

fn write_entries(path: &Path, entries: &Entries) -> StorageResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    serde_json::to_writer_pretty(&mut tmp, entries)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StorageError::Io(e.error))?;
    Ok(())
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        Ok(entries.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(entries).await?;
        debug!(key = %key, path = %self.path.display(), "Stored session entry");
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_entries(entries).await?;
        debug!(key = %key, path = %self.path.display(), "Removed session entry");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
