//! Unverified JWT claim decoding
//!
//! Reads the payload segment of a compact JWT without checking its
//! signature. Only use the result for display and fallback identity, never
//! for authorization.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Errors from [`decode_unverified_claims`]
#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("Token is not a compact JWT")]
    Malformed,

    #[error("Token payload is not valid base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Registered claims the client cares about
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Subject; the API puts the account email here.
    #[serde(default)]
    pub sub: Option<String>,

    /// Expiry as seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Expiry as a timestamp, if the token carries a valid one.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp?, 0).single()
    }

    /// Whether the token had expired at `now`. Tokens without `exp` never
    /// expire.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expires_at| expires_at <= now)
    }
}

/// Decodes the claims of `token` without verifying it.
///
/// # Errors
/// Returns `ClaimsError::Malformed` unless the token has exactly three
/// dot-separated segments, and `Encoding`/`Json` when the payload segment
/// cannot be read.
pub fn decode_unverified_claims(token: &str) -> Result<TokenClaims, ClaimsError> {
    let mut segments = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return Err(ClaimsError::Malformed);
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    Ok(serde_json::from_slice(&bytes)?)
}
