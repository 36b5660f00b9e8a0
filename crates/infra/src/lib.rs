//! # Wild Welcome Infrastructure
//!
//! Adapters for the ports defined in `wildwelcome-core`.
//!
//! This crate contains:
//! - The reqwest-backed auth API client
//! - The JSON file session store
//! - Configuration loading (env, `.env`, JSON/TOML files)
//! - Tracing subscriber setup
//! - Bootstrap wiring
//!
//! ## Architecture
//! - Implements traits defined in `wildwelcome-core` and `wildwelcome-common`
//! - Contains all "impure" code (HTTP, filesystem, environment)

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod observability;
pub mod storage;

// Re-export commonly used items
pub use api::HttpAuthApi;
pub use bootstrap::{bootstrap, bootstrap_from_env, build_storage, AppContext};
pub use observability::init_tracing;
pub use storage::FileStore;
