//! Port interface for navigation
//!
//! The session manager requests navigations (after login, after logout) but
//! never performs them; the UI shell supplies the implementation.

use tracing::debug;

/// Receives navigation requests from session logic
pub trait Navigator: Send + Sync {
    /// Move the UI to `path`.
    fn navigate(&self, path: &str);
}

/// Navigator for headless use; only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, path: &str) {
        debug!(path = %path, "Navigation requested without a navigator attached");
    }
}
