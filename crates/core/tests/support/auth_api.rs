//! Scriptable `AuthApi` mock
//!
//! Every response can be configured up front; every call is recorded as
//! `"<endpoint>:<argument>"` so tests can assert on traffic.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use wildwelcome_core::{AuthApi, AuthApiError};
use wildwelcome_domain::{LoginCredentials, RegistrationRequest, TokenPair, UserProfile};

#[derive(Debug)]
pub struct MockAuthApi {
    logins: Mutex<HashMap<String, Result<TokenPair, AuthApiError>>>,
    default_login: Mutex<Result<TokenPair, AuthApiError>>,
    register: Mutex<Result<(), AuthApiError>>,
    logout: Mutex<Result<(), AuthApiError>>,
    refreshes: Mutex<VecDeque<Result<TokenPair, AuthApiError>>>,
    profiles: Mutex<HashMap<String, UserProfile>>,
    default_profile: Mutex<Result<UserProfile, AuthApiError>>,
    login_delay: Mutex<Option<Duration>>,
    refresh_delay: Mutex<Option<Duration>>,
    calls: Mutex<Vec<String>>,
}

impl Default for MockAuthApi {
    fn default() -> Self {
        Self {
            logins: Mutex::new(HashMap::new()),
            default_login: Mutex::new(Err(AuthApiError::Unauthorized {
                detail: Some("Incorrect email or password".into()),
            })),
            register: Mutex::new(Ok(())),
            logout: Mutex::new(Ok(())),
            refreshes: Mutex::new(VecDeque::new()),
            profiles: Mutex::new(HashMap::new()),
            default_profile: Mutex::new(Err(AuthApiError::Rejected { status: 500, detail: None })),
            login_delay: Mutex::new(None),
            refresh_delay: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockAuthApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `email` and answer with `tokens`.
    pub fn accept_login(&self, email: &str, tokens: TokenPair) -> &Self {
        self.logins.lock().unwrap().insert(email.to_string(), Ok(tokens));
        self
    }

    pub fn fail_login(&self, email: &str, error: AuthApiError) -> &Self {
        self.logins.lock().unwrap().insert(email.to_string(), Err(error));
        self
    }

    pub fn set_register(&self, result: Result<(), AuthApiError>) -> &Self {
        *self.register.lock().unwrap() = result;
        self
    }

    pub fn set_logout(&self, result: Result<(), AuthApiError>) -> &Self {
        *self.logout.lock().unwrap() = result;
        self
    }

    /// Queue the result of the next `refresh` call. An empty queue answers
    /// `Unauthorized`.
    pub fn push_refresh(&self, result: Result<TokenPair, AuthApiError>) -> &Self {
        self.refreshes.lock().unwrap().push_back(result);
        self
    }

    /// Serve `profile` for requests bearing `access_token`.
    pub fn serve_profile(&self, access_token: &str, profile: UserProfile) -> &Self {
        self.profiles.lock().unwrap().insert(access_token.to_string(), profile);
        self
    }

    /// Answer for tokens without a dedicated profile.
    pub fn set_default_profile(&self, result: Result<UserProfile, AuthApiError>) -> &Self {
        *self.default_profile.lock().unwrap() = result;
        self
    }

    pub fn delay_logins(&self, delay: Duration) -> &Self {
        *self.login_delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn delay_refreshes(&self, delay: Duration) -> &Self {
        *self.refresh_delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, endpoint: &str) -> usize {
        let prefix = format!("{endpoint}:");
        self.calls.lock().unwrap().iter().filter(|call| call.starts_with(&prefix)).count()
    }

    fn record(&self, endpoint: &str, argument: &str) {
        self.calls.lock().unwrap().push(format!("{endpoint}:{argument}"));
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn login(&self, credentials: &LoginCredentials) -> Result<TokenPair, AuthApiError> {
        self.record("login", &credentials.email);
        let delay = *self.login_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.logins.lock().unwrap().get(&credentials.email).cloned();
        scripted.unwrap_or_else(|| self.default_login.lock().unwrap().clone())
    }

    async fn register(&self, request: &RegistrationRequest) -> Result<(), AuthApiError> {
        self.record("register", &request.email);
        self.register.lock().unwrap().clone()
    }

    async fn logout(&self, access_token: &str) -> Result<(), AuthApiError> {
        self.record("logout", access_token);
        self.logout.lock().unwrap().clone()
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthApiError> {
        self.record("refresh", refresh_token);
        let delay = *self.refresh_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.refreshes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AuthApiError::Unauthorized { detail: None }))
    }

    async fn current_user(&self, access_token: &str) -> Result<UserProfile, AuthApiError> {
        self.record("current_user", access_token);
        let served = self.profiles.lock().unwrap().get(access_token).cloned();
        match served {
            Some(profile) => Ok(profile),
            None => self.default_profile.lock().unwrap().clone(),
        }
    }
}
