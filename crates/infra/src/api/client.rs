//! HTTP client for the Wild Welcome auth and profile endpoints
//!
//! Every request carries the configured timeout. Bearer tokens are attached
//! per call; the client itself holds no session state.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use url::Url;
use wildwelcome_common::auth::TokenResponse;
use wildwelcome_core::{AuthApi, AuthApiError};
use wildwelcome_domain::{
    ApiConfig, LoginCredentials, RegistrationRequest, Result, TokenPair, UserProfile,
    WelcomeError,
};

use super::errors::{is_retryable_status, map_status_error, map_transport_error};

const LOGIN_PATH: &str = "/auth/login";
const REGISTER_PATH: &str = "/auth/register";
const LOGOUT_PATH: &str = "/auth/logout";
const REFRESH_PATH: &str = "/auth/refresh";
const CURRENT_USER_PATH: &str = "/users/me";

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// reqwest-backed [`AuthApi`]
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpAuthApi {
    /// Create a client for `config.base_url`.
    ///
    /// # Errors
    /// Returns `WelcomeError::Config` if the base URL is not an absolute
    /// http(s) URL or the HTTP client cannot be built
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let parsed = Url::parse(&config.base_url).map_err(|e| {
            WelcomeError::Config(format!("Invalid API base URL '{}': {e}", config.base_url))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(WelcomeError::Config(format!(
                "API base URL must use http or https: {}",
                config.base_url
            )));
        }

        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WelcomeError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_string(), timeout })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn request(&self, method: Method, path: &str, bearer: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        match bearer {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, path: &str) -> std::result::Result<Response, AuthApiError> {
        let response = builder.send().await.map_err(|e| {
            warn!(path = %path, error = %e, "Request failed before a response");
            map_transport_error(&e)
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(path = %path, status = status.as_u16(), "Request succeeded");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = map_status_error(status, &body);
        if is_retryable_status(status.as_u16()) {
            warn!(path = %path, status = status.as_u16(), "Server-side failure");
        } else {
            debug!(path = %path, status = status.as_u16(), "Request rejected");
        }
        Err(err)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> std::result::Result<T, AuthApiError> {
        if response.status() == StatusCode::NO_CONTENT {
            return Err(AuthApiError::Decode("empty response body".to_string()));
        }
        response.json::<T>().await.map_err(|e| AuthApiError::Decode(e.to_string()))
    }
}

fn token_pair(response: TokenResponse) -> TokenPair {
    TokenPair::new(response.access_token, response.refresh_token)
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn login(&self, credentials: &LoginCredentials) -> std::result::Result<TokenPair, AuthApiError> {
        let builder = self.request(Method::POST, LOGIN_PATH, None).json(credentials);
        let response = self.send(builder, LOGIN_PATH).await?;
        let tokens: TokenResponse = Self::decode(response).await?;
        info!(has_refresh_token = tokens.refresh_token.is_some(), "Login accepted");
        Ok(token_pair(tokens))
    }

    #[instrument(skip(self, request), fields(email = %request.email, user_type = %request.user_type))]
    async fn register(&self, request: &RegistrationRequest) -> std::result::Result<(), AuthApiError> {
        let builder = self.request(Method::POST, REGISTER_PATH, None).json(request);
        self.send(builder, REGISTER_PATH).await?;
        info!("Registration accepted");
        Ok(())
    }

    #[instrument(skip_all)]
    async fn logout(&self, access_token: &str) -> std::result::Result<(), AuthApiError> {
        let builder = self.request(Method::POST, LOGOUT_PATH, Some(access_token));
        self.send(builder, LOGOUT_PATH).await?;
        Ok(())
    }

    #[instrument(skip_all)]
    async fn refresh(&self, refresh_token: &str) -> std::result::Result<TokenPair, AuthApiError> {
        let builder = self
            .request(Method::POST, REFRESH_PATH, None)
            .json(&RefreshRequest { refresh_token });
        let response = self.send(builder, REFRESH_PATH).await?;
        let tokens: TokenResponse = Self::decode(response).await?;
        Ok(token_pair(tokens))
    }

    #[instrument(skip_all)]
    async fn current_user(&self, access_token: &str) -> std::result::Result<UserProfile, AuthApiError> {
        let builder = self.request(Method::GET, CURRENT_USER_PATH, Some(access_token));
        let response = self.send(builder, CURRENT_USER_PATH).await?;
        Self::decode(response).await
    }
}
