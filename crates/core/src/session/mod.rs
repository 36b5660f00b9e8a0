//! Session lifecycle
//!
//! [`SessionStore`] persists the session record; [`SessionManager`] is the
//! only writer of that store after startup and owns the in-memory snapshot
//! every reader sees.

pub mod error;
pub mod manager;
pub mod store;

pub use error::SessionError;
pub use manager::SessionManager;
pub use store::{PersistedSession, SessionStore, SessionWrite, Slot};
