//! Application constants
//!
//! Centralized location for storage keys, route paths and user-facing
//! messages shared by the session and routing layers.

// Persisted session keys
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";

// Route paths
pub const LANDING_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const SIGNUP_PATH: &str = "/signup";
pub const CONFIRMATION_PATH: &str = "/confirmation";
pub const TENANT_HOME_PATH: &str = "/user";
pub const LANDLORD_HOME_PATH: &str = "/landlord/dashboard";

// Remote API defaults
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STORAGE_PATH: &str = "wildwelcome-session.json";
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "WildWelcome.session";
pub const DEFAULT_LOG_FILTER: &str = "info";

// User-facing messages
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please try again.";
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed. Please try again.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please login again.";
