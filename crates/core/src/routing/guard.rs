//! Route guard bound to a live session

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use wildwelcome_domain::SessionSnapshot;

use super::policy::{evaluate, GuardDecision};
use super::table::RouteTable;
use crate::session::SessionManager;

/// Read access to the session, as needed by [`RouteGuard`]
#[async_trait]
pub trait SessionReader: Send + Sync {
    async fn snapshot(&self) -> SessionSnapshot;

    /// Remember where an anonymous visitor was heading.
    async fn remember_return_location(&self, path: &str);
}

#[async_trait]
impl SessionReader for SessionManager {
    async fn snapshot(&self) -> SessionSnapshot {
        Self::snapshot(self).await
    }

    async fn remember_return_location(&self, path: &str) {
        Self::remember_return_location(self, path).await;
    }
}

/// Decides, for each navigation, whether the requested view may render
pub struct RouteGuard {
    session: Arc<dyn SessionReader>,
    routes: RouteTable,
}

impl RouteGuard {
    pub fn new(session: Arc<dyn SessionReader>, routes: RouteTable) -> Self {
        Self { session, routes }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Evaluates `path` against the current session.
    ///
    /// Unknown paths render (as the not-found view). When the visitor is
    /// sent to sign in, the requested path is remembered on the session.
    pub async fn check(&self, path: &str) -> GuardDecision {
        let snapshot = self.session.snapshot().await;
        let route = self.routes.resolve(path);
        let decision = evaluate(&snapshot, &route.policy(), path);

        if let GuardDecision::Redirect { return_to: Some(location), .. } = &decision {
            self.session.remember_return_location(location).await;
        }

        debug!(path = %path, decision = ?decision, phase = %snapshot.phase, "Route checked");
        decision
    }
}
