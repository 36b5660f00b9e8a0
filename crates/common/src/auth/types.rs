//! Token endpoint wire types
//!
//! Shapes of the JSON bodies exchanged with `/auth/login`, `/auth/refresh`
//! and the `{"detail": ...}` error envelope the API uses for every failure.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body returned by the login and refresh endpoints
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Refresh token; some deployments omit it on refresh
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Token type, `"bearer"` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Error envelope returned by the API
///
/// `detail` is usually a string. Validation failures instead carry a list of
/// objects with a `msg` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ApiErrorBody {
    /// Human-readable message carried by `detail`, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            Value::Array(items) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            _ => None,
        }
    }

    /// Parses an error body, returning `None` for anything that is not the
    /// `{"detail": ...}` envelope.
    #[must_use]
    pub fn parse_message(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body).ok()?.message()
    }
}
