//! Key-value storage primitives
//!
//! Session persistence only needs string values under a handful of string
//! keys. Backends implement [`KeyValueStore`]; this module ships the
//! in-memory backend, `security` ships the platform keychain, and the infra
//! crate adds a file-backed store.

pub mod error;
pub mod memory;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use types::KeyValueStore;
