//! Testing utilities and helpers
//!
//! - **[`mocks`]**: Failure-injecting storage for exercising error paths
//!
//! ## Usage
//!
//! ```rust
//! use wildwelcome_common::testing::FaultyStore;
//!
//! let store = FaultyStore::new();
//! store.fail_removal_of("user");
//! ```

pub mod mocks;

pub use mocks::{FaultyStore, StoreCall};
