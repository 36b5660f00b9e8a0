//! Port interfaces for the remote authentication API
//!
//! These traits define the boundary between session logic and the HTTP
//! adapter in `wildwelcome-infra`.

use async_trait::async_trait;
use thiserror::Error;
use wildwelcome_domain::{
    LoginCredentials, RegistrationRequest, TokenPair, UserProfile, WelcomeError,
};

/// Failures reported by an [`AuthApi`] implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthApiError {
    /// 401/403: credentials or bearer token rejected.
    #[error("Unauthorized{}", detail_suffix(.detail))]
    Unauthorized { detail: Option<String> },

    /// Any other non-success status.
    #[error("Request rejected with status {status}{}", detail_suffix(.detail))]
    Rejected { status: u16, detail: Option<String> },

    /// Connection, TLS or timeout failure.
    #[error("Network error: {0}")]
    Network(String),

    /// Success status with a body that could not be decoded.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default()
}

impl AuthApiError {
    /// Server-supplied `detail` message, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { detail } | Self::Rejected { detail, .. } => detail.as_deref(),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

impl From<AuthApiError> for WelcomeError {
    fn from(err: AuthApiError) -> Self {
        match err {
            AuthApiError::Unauthorized { .. } => Self::Auth(err.to_string()),
            AuthApiError::Network(_) => Self::Network(err.to_string()),
            AuthApiError::Rejected { .. } | AuthApiError::Decode(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

/// Remote authentication and profile endpoints
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /auth/login`
    ///
    /// # Errors
    /// Returns `Unauthorized` for bad credentials, other variants for
    /// transport or server failures
    async fn login(&self, credentials: &LoginCredentials) -> Result<TokenPair, AuthApiError>;

    /// `POST /auth/register`. The response body is ignored.
    async fn register(&self, request: &RegistrationRequest) -> Result<(), AuthApiError>;

    /// `POST /auth/logout` with the bearer token. The response body is
    /// ignored.
    async fn logout(&self, access_token: &str) -> Result<(), AuthApiError>;

    /// `POST /auth/refresh`
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthApiError>;

    /// `GET /users/me` with the bearer token
    async fn current_user(&self, access_token: &str) -> Result<UserProfile, AuthApiError>;
}
