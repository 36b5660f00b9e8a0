//! Shared test helpers for `wildwelcome-core` integration tests.
//!
//! A scriptable `AuthApi`, a navigator that records every request, and
//! fixtures for wiring a `SessionManager` over an in-memory store.

#![allow(dead_code)]

pub mod auth_api;
pub mod fixtures;
pub mod navigator;

pub use auth_api::MockAuthApi;
pub use fixtures::*;
pub use navigator::RecordingNavigator;
