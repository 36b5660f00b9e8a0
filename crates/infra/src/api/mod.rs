//! Remote API adapter
//!
//! [`HttpAuthApi`] implements the `AuthApi` port over reqwest.

pub mod client;
pub mod errors;

pub use client::HttpAuthApi;
pub use errors::{map_status_error, map_transport_error};
