//! # Wild Welcome Domain
//!
//! Session and account types shared by every Wild Welcome crate.
//!
//! This crate contains:
//! - User profile and session data types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Route and storage constants
//!
//! ## Architecture
//! - No dependencies on other Wild Welcome crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
