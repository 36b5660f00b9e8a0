//! Session fixtures

use std::sync::Arc;

use wildwelcome_common::storage::MemoryStore;
use wildwelcome_core::{SessionManager, SessionStore};
use wildwelcome_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY};
use wildwelcome_domain::{SessionUser, UserProfile, UserType};

use super::{MockAuthApi, RecordingNavigator};

pub fn tenant_profile() -> UserProfile {
    UserProfile::new("tess@example.com", UserType::Tenant).with_name("Tess", "Tenant")
}

pub fn landlord_profile() -> UserProfile {
    UserProfile::new("lars@example.com", UserType::Landlord).with_name("Lars", "Landlord")
}

/// A manager plus handles on everything it talks to.
pub struct Harness {
    pub manager: Arc<SessionManager>,
    pub api: Arc<MockAuthApi>,
    pub storage: MemoryStore,
    pub navigator: Arc<RecordingNavigator>,
}

impl Harness {
    pub fn new(api: MockAuthApi) -> Self {
        Self::with_storage(api, MemoryStore::new())
    }

    pub fn with_storage(api: MockAuthApi, storage: MemoryStore) -> Self {
        let api = Arc::new(api);
        let navigator = Arc::new(RecordingNavigator::default());
        let store = SessionStore::new(Arc::new(storage.clone()));
        let manager = Arc::new(SessionManager::new(api.clone(), store, navigator.clone()));
        Self { manager, api, storage, navigator }
    }

    /// Storage holding a previous session.
    pub fn persisted(
        access_token: &str,
        refresh_token: Option<&str>,
        user: Option<&SessionUser>,
    ) -> MemoryStore {
        let storage = MemoryStore::new();
        storage.insert(ACCESS_TOKEN_KEY, access_token);
        if let Some(refresh_token) = refresh_token {
            storage.insert(REFRESH_TOKEN_KEY, refresh_token);
        }
        if let Some(user) = user {
            storage.insert(USER_KEY, serde_json::to_string(user).unwrap());
        }
        storage
    }

    pub fn assert_storage_empty(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
            assert!(!self.storage.contains(key), "{key} should have been cleared");
        }
    }
}
