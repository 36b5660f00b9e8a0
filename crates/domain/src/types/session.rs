//! Session snapshot and lifecycle types

use std::fmt;

use serde::{Deserialize, Serialize};

use super::user::{SessionUser, UserType};
use crate::impl_wire_name_conversions;

/// Lifecycle phase of the session manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Startup resolution has not begun.
    #[default]
    Uninitialized,
    /// Persisted tokens are being validated.
    Resolving,
    Anonymous,
    Authenticated,
}

impl_wire_name_conversions!(SessionPhase {
    Uninitialized => "uninitialized",
    Resolving => "resolving",
    Anonymous => "anonymous",
    Authenticated => "authenticated",
});

/// Session operation currently awaiting the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOperation {
    Login,
    Register,
    Logout,
    RefreshProfile,
    RefreshToken,
}

impl_wire_name_conversions!(SessionOperation {
    Login => "login",
    Register => "register",
    Logout => "logout",
    RefreshProfile => "refresh_profile",
    RefreshToken => "refresh_token",
});

/// Access/refresh token pair issued by `/auth/login` and `/auth/refresh`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self { access_token: access_token.into(), refresh_token }
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish()
    }
}

/// Point-in-time view of the session, handed to readers by value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<SessionUser>,
    pub phase: SessionPhase,
    pub pending: Option<SessionOperation>,
}

impl SessionSnapshot {
    /// True iff both an access token and a user are present.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.user.is_some()
    }

    /// True until startup resolution finishes.
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SessionPhase::Uninitialized | SessionPhase::Resolving)
    }

    /// Routing account type of the current user, if any.
    pub fn user_type(&self) -> Option<UserType> {
        self.user.as_ref().map(SessionUser::effective_user_type)
    }
}

impl fmt::Debug for SessionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSnapshot")
            .field("has_access_token", &self.access_token.is_some())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("user", &self.user.as_ref().map(SessionUser::email))
            .field("phase", &self.phase)
            .field("pending", &self.pending)
            .finish()
    }
}
