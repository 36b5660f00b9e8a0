//! # Wild Welcome Core
//!
//! Session lifecycle and access-control logic - no infrastructure
//! dependencies.
//!
//! This crate contains:
//! - Port interfaces for the remote auth API and navigation
//! - The session store and session manager
//! - Route policies, the route registry and the route guard
//!
//! ## Architecture Principles
//! - Only depends on `wildwelcome-common` and `wildwelcome-domain`
//! - No HTTP, filesystem or platform code
//! - All external dependencies via traits

pub mod auth;
pub mod navigation;
pub mod routing;
pub mod session;

// Re-export specific items to avoid ambiguity
pub use auth::ports::{AuthApi, AuthApiError};
pub use navigation::ports::{Navigator, NoopNavigator};
pub use routing::{
    evaluate, GuardDecision, RouteGuard, RouteMatch, RoutePattern, RoutePolicy, RouteTable,
    SessionReader,
};
pub use session::{PersistedSession, SessionError, SessionManager, SessionStore, SessionWrite, Slot};
