//! Durable session record
//!
//! Three keys hold the session: `accessToken`, `refreshToken` and `user`
//! (JSON). The store keeps an in-memory mirror of the last record it read or
//! wrote and serializes every backend operation through one async mutex.

use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};
use wildwelcome_common::storage::{KeyValueStore, StorageError, StorageResult};
use wildwelcome_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY};
use wildwelcome_domain::{SessionUser, TokenPair};

/// Per-key instruction for [`SessionStore::save`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Slot<T> {
    /// Leave the stored value untouched.
    #[default]
    Keep,
    Set(T),
    /// Remove the key.
    Clear,
}

impl<T> Slot<T> {
    /// `Set` for `Some`, `Clear` for `None`.
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Clear, Self::Set)
    }

    fn apply_to(self, current: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Set(value) => *current = Some(value),
            Self::Clear => *current = None,
        }
    }
}

/// A partial update of the session record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionWrite {
    pub access_token: Slot<String>,
    pub refresh_token: Slot<String>,
    pub user: Slot<SessionUser>,
}

impl SessionWrite {
    /// Replace both tokens; a missing refresh token clears the stored one.
    pub fn tokens(tokens: &TokenPair) -> Self {
        Self {
            access_token: Slot::Set(tokens.access_token.clone()),
            refresh_token: Slot::from_option(tokens.refresh_token.clone()),
            user: Slot::Keep,
        }
    }

    /// Replace only the cached user.
    pub fn user(user: SessionUser) -> Self {
        Self { user: Slot::Set(user), ..Self::default() }
    }

    #[must_use]
    pub fn with_user(mut self, user: SessionUser) -> Self {
        self.user = Slot::Set(user);
        self
    }
}

/// Session record as read back from storage
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PersistedSession {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<SessionUser>,
}

impl PersistedSession {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.user.is_none()
    }
}

impl fmt::Debug for PersistedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistedSession")
            .field("has_access_token", &self.access_token.is_some())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("user", &self.user.as_ref().map(SessionUser::email))
            .finish()
    }
}

/// Persistence for the session record over any [`KeyValueStore`]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
    mirror: Mutex<PersistedSession>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend, mirror: Mutex::new(PersistedSession::default()) }
    }

    /// Reads the record from the backend and refreshes the mirror.
    ///
    /// A missing or unreadable `user` value is treated as absent.
    ///
    /// # Errors
    /// Returns error if the backend cannot be read
    pub async fn load(&self) -> StorageResult<PersistedSession> {
        let mut mirror = self.mirror.lock().await;

        let access_token = self.backend.get(ACCESS_TOKEN_KEY).await?;
        let refresh_token = self.backend.get(REFRESH_TOKEN_KEY).await?;
        let user = match self.backend.get(USER_KEY).await? {
            Some(raw) => match serde_json::from_str::<SessionUser>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!(
                        backend = self.backend.backend_name(),
                        error = %err,
                        "Ignoring unreadable persisted user"
                    );
                    None
                }
            },
            None => None,
        };

        *mirror = PersistedSession { access_token, refresh_token, user };
        debug!(backend = self.backend.backend_name(), session = ?*mirror, "Session record loaded");
        Ok(mirror.clone())
    }

    /// Applies `write` key by key, stopping at the first backend error.
    ///
    /// # Errors
    /// Returns error if the backend rejects a write; keys before the failing
    /// one have already been written
    pub async fn save(&self, write: SessionWrite) -> StorageResult<()> {
        let mut mirror = self.mirror.lock().await;

        let user_json = match &write.user {
            Slot::Set(user) => Some(serde_json::to_string(user)?),
            Slot::Keep | Slot::Clear => None,
        };

        self.apply(ACCESS_TOKEN_KEY, slot_value(&write.access_token)).await?;
        write.access_token.apply_to(&mut mirror.access_token);

        self.apply(REFRESH_TOKEN_KEY, slot_value(&write.refresh_token)).await?;
        write.refresh_token.apply_to(&mut mirror.refresh_token);

        let user_slot = match (&write.user, user_json.as_deref()) {
            (Slot::Set(_), Some(json)) => Slot::Set(json),
            (Slot::Clear, _) => Slot::Clear,
            _ => Slot::Keep,
        };
        self.apply(USER_KEY, user_slot).await?;
        write.user.apply_to(&mut mirror.user);

        Ok(())
    }

    /// Removes every key, access token first.
    ///
    /// All removals are attempted even after a failure so a partial clear
    /// never leaves a record that still looks restorable. The mirror is
    /// always emptied.
    ///
    /// # Errors
    /// Returns the first backend error encountered
    pub async fn clear(&self) -> StorageResult<()> {
        let mut mirror = self.mirror.lock().await;
        *mirror = PersistedSession::default();

        let mut first_error: Option<StorageError> = None;
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
            if let Err(err) = self.backend.remove(key).await {
                warn!(backend = self.backend.backend_name(), key, error = %err, "Failed to remove session key");
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => {
                debug!(backend = self.backend.backend_name(), "Session record cleared");
                Ok(())
            }
        }
    }

    /// Last record read or written, without touching the backend.
    pub async fn cached(&self) -> PersistedSession {
        self.mirror.lock().await.clone()
    }

    async fn apply(&self, key: &str, slot: Slot<&str>) -> StorageResult<()> {
        match slot {
            Slot::Keep => Ok(()),
            Slot::Set(value) => self.backend.set(key, value).await,
            Slot::Clear => self.backend.remove(key).await,
        }
    }
}

fn slot_value(slot: &Slot<String>) -> Slot<&str> {
    match slot {
        Slot::Keep => Slot::Keep,
        Slot::Set(value) => Slot::Set(value.as_str()),
        Slot::Clear => Slot::Clear,
    }
}
