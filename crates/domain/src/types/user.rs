//! User profile types
//!
//! Profiles are owned by the remote API and cached locally as part of the
//! session record.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::impl_wire_name_conversions;

/// Account type, fixed at registration.
///
/// The API calls tenants `"user"`; `"tenant"` is accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UserType {
    #[default]
    #[serde(rename = "user", alias = "tenant")]
    Tenant,
    #[serde(rename = "landlord")]
    Landlord,
}

impl_wire_name_conversions!(UserType {
    Tenant => "user",
    Landlord => "landlord",
}; aliases {
    "tenant" => Tenant,
});

impl UserType {
    /// Home route for this account type.
    #[must_use]
    pub const fn home_path(&self) -> &'static str {
        match self {
            Self::Tenant => crate::constants::TENANT_HOME_PATH,
            Self::Landlord => crate::constants::LANDLORD_HOME_PATH,
        }
    }
}

/// User profile as returned by `GET /users/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub user_type: UserType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub is_verified: bool,
}

fn default_active() -> bool {
    true
}

impl UserProfile {
    /// Minimal active, unverified profile.
    pub fn new(email: impl Into<String>, user_type: UserType) -> Self {
        Self {
            id: None,
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            user_type,
            phone: None,
            profile_image: None,
            is_active: true,
            is_verified: false,
        }
    }

    /// Sets first and last name.
    #[must_use]
    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }
}

/// Stand-in profile used when the profile endpoint is unavailable right
/// after a successful login.
///
/// It carries no account type; callers that need one go through
/// [`SessionUser::effective_user_type`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialProfile {
    pub email: String,
    /// Raw `sub` claim of the access token, when it could be decoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// The cached user of a session.
///
/// Persisted as plain JSON; a record with a `user_type` reads back as
/// `Full`, anything else with an `email` as `Partial`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionUser {
    Full(UserProfile),
    Partial(PartialProfile),
}

impl SessionUser {
    pub fn email(&self) -> &str {
        match self {
            Self::Full(profile) => &profile.email,
            Self::Partial(partial) => &partial.email,
        }
    }

    /// Account type reported by the API, `None` for partial profiles.
    pub fn user_type(&self) -> Option<UserType> {
        match self {
            Self::Full(profile) => Some(profile.user_type),
            Self::Partial(_) => None,
        }
    }

    /// Account type used for routing decisions. Partial profiles are
    /// treated as tenants.
    pub fn effective_user_type(&self) -> UserType {
        self.user_type().unwrap_or(UserType::Tenant)
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial(_))
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            Self::Full(profile) => Some(profile),
            Self::Partial(_) => None,
        }
    }

    pub fn is_landlord(&self) -> bool {
        self.effective_user_type() == UserType::Landlord
    }

    pub fn is_tenant(&self) -> bool {
        self.effective_user_type() == UserType::Tenant
    }

    /// "First Last", falling back to the email when no name is known.
    pub fn display_name(&self) -> String {
        let name = match self {
            Self::Full(profile) => {
                format!("{} {}", profile.first_name, profile.last_name).trim().to_string()
            }
            Self::Partial(_) => String::new(),
        };
        if name.is_empty() {
            self.email().to_string()
        } else {
            name
        }
    }

    /// Uppercase initials of first and last name, or of the email when no
    /// name is known.
    pub fn initials(&self) -> String {
        let from_names = match self {
            Self::Full(profile) => [&profile.first_name, &profile.last_name]
                .iter()
                .filter_map(|part| part.trim().chars().next())
                .flat_map(char::to_uppercase)
                .collect::<String>(),
            Self::Partial(_) => String::new(),
        };
        if !from_names.is_empty() {
            return from_names;
        }
        self.email().chars().next().map(|c| c.to_uppercase().collect()).unwrap_or_default()
    }
}

impl From<UserProfile> for SessionUser {
    fn from(profile: UserProfile) -> Self {
        Self::Full(profile)
    }
}

impl From<PartialProfile> for SessionUser {
    fn from(partial: PartialProfile) -> Self {
        Self::Partial(partial)
    }
}

/// Credentials posted to `/auth/login`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Signup payload posted to `/auth/register`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl RegistrationRequest {
    /// Credentials used for the automatic login after signup.
    pub fn credentials(&self) -> LoginCredentials {
        LoginCredentials::new(self.email.clone(), self.password.clone())
    }
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("user_type", &self.user_type)
            .field("phone", &self.phone)
            .finish()
    }
}
