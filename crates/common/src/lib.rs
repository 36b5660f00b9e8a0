//! Generic utilities shared across Wild Welcome crates.
//!
//! Nothing in here knows about users, sessions or routes; those live in
//! `wildwelcome-domain` and `wildwelcome-core`.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: token claim decoding and wire types
//! - `runtime`: async key-value storage and the in-memory backend
//! - `platform`: platform keychain backend
//! - `observability`: optional tracing (not included by default)
//! - `test-utils`: failure-injecting storage for tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod auth;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod storage;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod security;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(all(feature = "runtime", any(feature = "test-utils", test)))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use auth::{decode_unverified_claims, ClaimsError, TokenClaims};
#[cfg(feature = "platform")]
pub use security::{KeychainError, KeychainProvider};
#[cfg(feature = "runtime")]
pub use storage::{KeyValueStore, MemoryStore, StorageError, StorageResult};
