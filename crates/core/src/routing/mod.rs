//! Route access control
//!
//! - **[`policy`]**: per-view access rules and the pure [`evaluate`]
//!   decision function
//! - **[`table`]**: the application's route registry
//! - **[`guard`]**: [`RouteGuard`], which combines the two with a live
//!   session

pub mod guard;
pub mod policy;
pub mod table;

pub use guard::{RouteGuard, SessionReader};
pub use policy::{evaluate, GuardDecision, RoutePolicy};
pub use table::{RouteMatch, RoutePattern, RouteTable};
