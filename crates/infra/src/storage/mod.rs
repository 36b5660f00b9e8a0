//! Durable storage backends
//!
//! The in-memory and keychain backends live in `wildwelcome-common`; this
//! module adds the JSON file backend used by default on desktop builds.

pub mod file_store;

pub use file_store::FileStore;
