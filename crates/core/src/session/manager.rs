//! Session manager
//!
//! Owns the in-memory [`SessionSnapshot`] and drives it through
//! `Uninitialized -> Resolving -> {Anonymous, Authenticated}` in response to
//! startup, login, registration, logout and refresh. It is the only writer
//! of the [`SessionStore`] once constructed.
//!
//! Every mutation takes the state write lock, persists, then updates the
//! snapshot, so the persisted record and the snapshot always agree on which
//! operation wrote last.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use wildwelcome_common::auth::decode_unverified_claims;
use wildwelcome_domain::constants::{
    LOGIN_FAILED_MESSAGE, LOGIN_PATH, REGISTRATION_FAILED_MESSAGE,
};
use wildwelcome_domain::{
    LoginCredentials, PartialProfile, RegistrationRequest, SessionOperation, SessionPhase,
    SessionSnapshot, SessionUser, TokenPair, UserProfile,
};

use super::error::SessionError;
use super::store::{PersistedSession, SessionStore, SessionWrite, Slot};
use crate::auth::ports::{AuthApi, AuthApiError};
use crate::navigation::ports::Navigator;

#[derive(Default)]
struct ManagerState {
    snapshot: SessionSnapshot,
    return_to: Option<String>,
}

/// Session lifecycle orchestrator
pub struct SessionManager {
    api: Arc<dyn AuthApi>,
    store: SessionStore,
    navigator: Arc<dyn Navigator>,
    state: RwLock<ManagerState>,
    /// Serializes token refreshes.
    refresh_lock: Mutex<()>,
}

impl SessionManager {
    /// Create a manager in the `Uninitialized` phase.
    pub fn new(api: Arc<dyn AuthApi>, store: SessionStore, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            store,
            navigator,
            state: RwLock::new(ManagerState::default()),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Current session, by value.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.read().await.snapshot.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.snapshot.is_authenticated()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.snapshot.is_loading()
    }

    pub async fn current_user(&self) -> Option<SessionUser> {
        self.state.read().await.snapshot.user.clone()
    }

    pub async fn is_landlord(&self) -> bool {
        self.current_user().await.is_some_and(|user| user.is_landlord())
    }

    pub async fn is_tenant(&self) -> bool {
        self.current_user().await.is_some_and(|user| user.is_tenant())
    }

    /// Initials of the signed-in user, empty when anonymous.
    pub async fn user_initials(&self) -> String {
        self.current_user().await.map(|user| user.initials()).unwrap_or_default()
    }

    /// Display name of the signed-in user, empty when anonymous.
    pub async fn display_name(&self) -> String {
        self.current_user().await.map(|user| user.display_name()).unwrap_or_default()
    }

    /// Resolves the persisted session.
    ///
    /// Runs once; later calls return the current snapshot without touching
    /// storage or the network.
    pub async fn initialize(&self) -> SessionSnapshot {
        {
            let mut state = self.state.write().await;
            if state.snapshot.phase != SessionPhase::Uninitialized {
                debug!(phase = %state.snapshot.phase, "Session already initialized");
                return state.snapshot.clone();
            }
            state.snapshot.phase = SessionPhase::Resolving;
        }

        let persisted = match self.store.load().await {
            Ok(persisted) => persisted,
            Err(err) => {
                warn!(error = %err, "Failed to read persisted session; starting anonymous");
                PersistedSession::default()
            }
        };

        let Some(access_token) = persisted.access_token.clone() else {
            return self.resolve_anonymous(!persisted.is_empty()).await;
        };

        match self.api.current_user(&access_token).await {
            Ok(profile) => {
                let user = match persisted.user {
                    Some(SessionUser::Full(cached)) if cached.user_type != profile.user_type => {
                        warn!(
                            cached = %cached.user_type,
                            reported = %profile.user_type,
                            "Ignoring profile with a different account type"
                        );
                        SessionUser::Full(cached)
                    }
                    _ => SessionUser::Full(profile),
                };
                self.resolve_authenticated(persisted.refresh_token, access_token, user).await
            }
            Err(err) => match persisted.user {
                Some(cached) => {
                    warn!(error = %err, "Profile fetch failed; keeping cached profile");
                    self.resolve_authenticated(persisted.refresh_token, access_token, cached).await
                }
                None => {
                    warn!(error = %err, "Profile fetch failed with no cached profile");
                    self.resolve_anonymous(true).await
                }
            },
        }
    }

    async fn resolve_authenticated(
        &self,
        refresh_token: Option<String>,
        access_token: String,
        user: SessionUser,
    ) -> SessionSnapshot {
        let mut state = self.state.write().await;
        if let Err(err) = self.store.save(SessionWrite::user(user.clone())).await {
            warn!(error = %err, "Failed to persist refreshed profile");
        }
        state.snapshot = SessionSnapshot {
            access_token: Some(access_token),
            refresh_token,
            user: Some(user),
            phase: SessionPhase::Authenticated,
            pending: None,
        };
        info!(
            user_type = ?state.snapshot.user_type(),
            "Session restored"
        );
        state.snapshot.clone()
    }

    async fn resolve_anonymous(&self, clear_store: bool) -> SessionSnapshot {
        let mut state = self.state.write().await;
        if clear_store {
            if let Err(err) = self.store.clear().await {
                warn!(error = %err, "Failed to clear unusable session record");
            }
        }
        state.snapshot =
            SessionSnapshot { phase: SessionPhase::Anonymous, ..SessionSnapshot::default() };
        info!("No restorable session");
        state.snapshot.clone()
    }

    /// Signs in with `credentials`.
    ///
    /// On success the session is authenticated even when the profile
    /// endpoint fails; a [`PartialProfile`] stands in until the next profile
    /// refresh. Navigates to the remembered return location, else the
    /// account type's home.
    ///
    /// # Errors
    /// Returns `SessionError::Credentials` with the API's message (or a
    /// generic one) when the credentials are refused; the session is left
    /// unchanged
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<SessionSnapshot, SessionError> {
        self.set_pending(SessionOperation::Login).await;

        let tokens = match self.api.login(credentials).await {
            Ok(tokens) => tokens,
            Err(err) => {
                warn!(error = %err, "Login rejected");
                self.clear_pending(SessionOperation::Login).await;
                return Err(SessionError::Credentials(credential_message(
                    &err,
                    LOGIN_FAILED_MESSAGE,
                )));
            }
        };

        let user = match self.api.current_user(&tokens.access_token).await {
            Ok(profile) => SessionUser::Full(profile),
            Err(err) => {
                warn!(error = %err, "Profile fetch failed after login; using token claims");
                SessionUser::Partial(partial_profile(&tokens.access_token, &credentials.email))
            }
        };

        let (snapshot, destination) = {
            let mut state = self.state.write().await;
            let write = SessionWrite::tokens(&tokens).with_user(user.clone());
            if let Err(err) = self.store.save(write).await {
                warn!(error = %err, "Failed to persist session after login");
            }
            state.snapshot = SessionSnapshot {
                access_token: Some(tokens.access_token),
                refresh_token: tokens.refresh_token,
                user: Some(user),
                phase: SessionPhase::Authenticated,
                pending: None,
            };
            let destination = state.return_to.take().unwrap_or_else(|| {
                state.snapshot.user_type().unwrap_or_default().home_path().to_string()
            });
            (state.snapshot.clone(), destination)
        };

        info!(
            user_type = ?snapshot.user_type(),
            partial_profile = snapshot.user.as_ref().is_some_and(SessionUser::is_partial),
            "Login succeeded"
        );
        self.navigator.navigate(&destination);
        Ok(snapshot)
    }

    /// Creates an account, then signs in with the same credentials.
    ///
    /// # Errors
    /// Returns `SessionError::Credentials` when signup is refused, or any
    /// error from the follow-up [`login`](Self::login)
    pub async fn register(&self, request: &RegistrationRequest) -> Result<SessionSnapshot, SessionError> {
        self.set_pending(SessionOperation::Register).await;

        if let Err(err) = self.api.register(request).await {
            warn!(error = %err, "Registration rejected");
            self.clear_pending(SessionOperation::Register).await;
            return Err(SessionError::Credentials(credential_message(
                &err,
                REGISTRATION_FAILED_MESSAGE,
            )));
        }

        info!(user_type = %request.user_type, "Registration accepted");
        self.login(&request.credentials()).await
    }

    /// Ends the session.
    ///
    /// The logout endpoint is called best-effort; storage and memory are
    /// cleared regardless and the UI is sent to the login page. Safe to call
    /// when already signed out.
    pub async fn logout(&self) -> SessionSnapshot {
        let access_token = {
            let mut state = self.state.write().await;
            state.snapshot.pending = Some(SessionOperation::Logout);
            state.snapshot.access_token.clone()
        };

        if let Some(token) = access_token {
            if let Err(err) = self.api.logout(&token).await {
                debug!(error = %err, "Logout endpoint failed; clearing session anyway");
            }
        }

        let snapshot = {
            let mut state = self.state.write().await;
            if let Err(err) = self.store.clear().await {
                warn!(error = %err, "Failed to clear persisted session");
            }
            *state = ManagerState {
                snapshot: SessionSnapshot {
                    phase: SessionPhase::Anonymous,
                    ..SessionSnapshot::default()
                },
                return_to: None,
            };
            state.snapshot.clone()
        };

        info!("Logged out");
        self.navigator.navigate(LOGIN_PATH);
        snapshot
    }

    /// Re-fetches the signed-in user's profile and updates it in place.
    ///
    /// # Errors
    /// - `NotAuthenticated` when nobody is signed in (or the session ended
    ///   while the request was in flight)
    /// - `ProfileUnavailable` when the request fails; the session is kept
    /// - `UserTypeChanged` when the API reports a different account type;
    ///   the cached profile is kept
    pub async fn refresh_profile(&self) -> Result<UserProfile, SessionError> {
        let access_token = {
            let mut state = self.state.write().await;
            if !state.snapshot.is_authenticated() {
                return Err(SessionError::NotAuthenticated);
            }
            state.snapshot.pending = Some(SessionOperation::RefreshProfile);
            state.snapshot.access_token.clone().ok_or(SessionError::NotAuthenticated)?
        };

        let profile = match self.api.current_user(&access_token).await {
            Ok(profile) => profile,
            Err(err) => {
                warn!(error = %err, "Profile refresh failed");
                self.clear_pending(SessionOperation::RefreshProfile).await;
                return Err(SessionError::ProfileUnavailable(err.to_string()));
            }
        };

        let mut state = self.state.write().await;
        if state.snapshot.pending == Some(SessionOperation::RefreshProfile) {
            state.snapshot.pending = None;
        }
        if state.snapshot.access_token.as_deref() != Some(access_token.as_str()) {
            debug!("Session changed during profile refresh; discarding result");
            return Err(SessionError::NotAuthenticated);
        }
        if let Some(cached) = state.snapshot.user.as_ref().and_then(SessionUser::user_type) {
            if cached != profile.user_type {
                warn!(
                    cached = %cached,
                    reported = %profile.user_type,
                    "Rejecting profile with a different account type"
                );
                return Err(SessionError::UserTypeChanged { cached, reported: profile.user_type });
            }
        }

        let user = SessionUser::Full(profile.clone());
        if let Err(err) = self.store.save(SessionWrite::user(user.clone())).await {
            warn!(error = %err, "Failed to persist refreshed profile");
        }
        state.snapshot.user = Some(user);
        debug!("Profile refreshed");
        Ok(profile)
    }

    /// Exchanges the refresh token for a new token pair.
    ///
    /// Returns the new access token. The stored refresh token is kept when
    /// the response omits one. Refreshes are serialized; if the session is
    /// replaced by a login or another refresh while the request is in
    /// flight, the result is discarded and the current access token is
    /// returned instead.
    ///
    /// # Errors
    /// Returns `SessionExpired` after logging out when there is no refresh
    /// token or the exchange fails, and without touching the session when
    /// it was logged out while the request was in flight
    pub async fn refresh_auth_token(&self) -> Result<String, SessionError> {
        let _refreshing = self.refresh_lock.lock().await;
        self.refresh_tokens().await
    }

    /// Body of [`refresh_auth_token`](Self::refresh_auth_token); callers hold
    /// `refresh_lock`.
    async fn refresh_tokens(&self) -> Result<String, SessionError> {
        let refresh_token = {
            let mut state = self.state.write().await;
            state.snapshot.pending = Some(SessionOperation::RefreshToken);
            state.snapshot.refresh_token.clone()
        };

        let Some(refresh_token) = refresh_token else {
            warn!("No refresh token available; ending session");
            self.logout().await;
            return Err(SessionError::SessionExpired);
        };

        let result = self.api.refresh(&refresh_token).await;

        let mut state = self.state.write().await;
        if state.snapshot.pending == Some(SessionOperation::RefreshToken) {
            state.snapshot.pending = None;
        }
        if state.snapshot.phase != SessionPhase::Authenticated {
            debug!("Session ended during token refresh; discarding result");
            return Err(SessionError::SessionExpired);
        }
        if state.snapshot.refresh_token.as_deref() != Some(refresh_token.as_str()) {
            debug!("Session replaced during token refresh; discarding result");
            return state.snapshot.access_token.clone().ok_or(SessionError::NotAuthenticated);
        }

        let tokens = match result {
            Ok(tokens) => tokens,
            Err(err) => {
                drop(state);
                warn!(error = %err, "Token refresh failed; ending session");
                self.logout().await;
                return Err(SessionError::SessionExpired);
            }
        };

        let tokens = TokenPair {
            refresh_token: tokens.refresh_token.or(Some(refresh_token)),
            ..tokens
        };

        let write = SessionWrite {
            access_token: Slot::Set(tokens.access_token.clone()),
            refresh_token: Slot::from_option(tokens.refresh_token.clone()),
            user: Slot::Keep,
        };
        if let Err(err) = self.store.save(write).await {
            warn!(error = %err, "Failed to persist refreshed tokens");
        }
        state.snapshot.access_token = Some(tokens.access_token.clone());
        state.snapshot.refresh_token = tokens.refresh_token;
        debug!("Access token refreshed");
        Ok(tokens.access_token)
    }

    /// Runs an authenticated call with the current access token.
    ///
    /// If `call` fails with `Unauthorized`, the token is refreshed once and
    /// `call` is retried once with the new token. Calls rejected at the same
    /// time share a single refresh: whoever refreshes second finds the token
    /// already replaced and retries with it.
    ///
    /// # Errors
    /// - `NotAuthenticated` when there is no access token
    /// - `SessionExpired` when the refresh fails (the session is ended)
    /// - `Api` for any other failure of `call`, including a second
    ///   `Unauthorized`
    pub async fn with_access_token<T, F, Fut>(&self, call: F) -> Result<T, SessionError>
    where
        F: Fn(String) -> Fut + Send,
        Fut: Future<Output = Result<T, AuthApiError>> + Send,
    {
        let access_token = self
            .state
            .read()
            .await
            .snapshot
            .access_token
            .clone()
            .ok_or(SessionError::NotAuthenticated)?;

        match call(access_token.clone()).await {
            Err(err) if err.is_unauthorized() => {
                debug!("Authenticated call rejected; refreshing token and retrying once");
                let refreshed = self.refresh_rejected(&access_token).await?;
                call(refreshed).await.map_err(SessionError::from)
            }
            other => other.map_err(SessionError::from),
        }
    }

    /// Token to retry with after `rejected` was refused.
    async fn refresh_rejected(&self, rejected: &str) -> Result<String, SessionError> {
        let _refreshing = self.refresh_lock.lock().await;
        {
            let state = self.state.read().await;
            if state.snapshot.is_authenticated() {
                if let Some(current) = state.snapshot.access_token.as_deref() {
                    if current != rejected {
                        debug!("Access token already refreshed by another call");
                        return Ok(current.to_string());
                    }
                }
            }
        }
        self.refresh_tokens().await
    }

    /// Records where an anonymous visitor was bounced from, for the next
    /// successful login. The login page itself is never recorded.
    pub async fn remember_return_location(&self, path: &str) {
        if path.split(['?', '#']).next() == Some(LOGIN_PATH) {
            return;
        }
        self.state.write().await.return_to = Some(path.to_string());
    }

    /// Location recorded by [`remember_return_location`](Self::remember_return_location).
    pub async fn return_location(&self) -> Option<String> {
        self.state.read().await.return_to.clone()
    }

    async fn set_pending(&self, operation: SessionOperation) {
        self.state.write().await.snapshot.pending = Some(operation);
    }

    async fn clear_pending(&self, operation: SessionOperation) {
        let mut state = self.state.write().await;
        if state.snapshot.pending == Some(operation) {
            state.snapshot.pending = None;
        }
    }
}

fn credential_message(err: &AuthApiError, fallback: &str) -> String {
    err.detail().map_or_else(|| fallback.to_string(), str::to_string)
}

/// Builds a stand-in profile from the token's `sub` claim, falling back to
/// the email the user typed.
fn partial_profile(access_token: &str, login_email: &str) -> PartialProfile {
    let subject = match decode_unverified_claims(access_token) {
        Ok(claims) => claims.sub,
        Err(err) => {
            debug!(error = %err, "Access token claims unreadable");
            None
        }
    };
    let email = subject
        .as_deref()
        .filter(|sub| sub.contains('@'))
        .unwrap_or(login_email)
        .to_string();
    PartialProfile { email, subject }
}
