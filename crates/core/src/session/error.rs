//! Session error types

use thiserror::Error;
use wildwelcome_domain::constants::SESSION_EXPIRED_MESSAGE;
use wildwelcome_domain::{UserType, WelcomeError};

use crate::auth::ports::AuthApiError;

/// Errors returned by [`SessionManager`](super::SessionManager) operations.
///
/// `Display` output is suitable for showing to the user.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Login or registration was refused.
    #[error("{0}")]
    Credentials(String),

    /// Token refresh failed; the session has been cleared.
    #[error("{}", SESSION_EXPIRED_MESSAGE)]
    SessionExpired,

    /// The operation needs a signed-in user.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The profile endpoint could not be reached or returned an error.
    #[error("Profile unavailable: {0}")]
    ProfileUnavailable(String),

    /// The API reported a different account type for the signed-in user.
    #[error("Account type changed from {cached} to {reported}; sign in again")]
    UserTypeChanged { cached: UserType, reported: UserType },

    /// An authenticated call failed for a reason other than an expired
    /// token.
    #[error(transparent)]
    Api(#[from] AuthApiError),
}

impl From<SessionError> for WelcomeError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Api(api) => api.into(),
            SessionError::ProfileUnavailable(_) => Self::Network(err.to_string()),
            other => Self::Auth(other.to_string()),
        }
    }
}
