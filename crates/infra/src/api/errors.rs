//! HTTP failure classification
//!
//! Maps reqwest transport errors and non-success responses onto the
//! `AuthApiError` port type.

use reqwest::StatusCode;
use wildwelcome_common::auth::ApiErrorBody;
use wildwelcome_core::AuthApiError;

/// Classifies a non-success response.
///
/// 401/403 become `Unauthorized`; everything else is `Rejected`. The
/// `{"detail": ...}` envelope, when present, supplies the message.
pub fn map_status_error(status: StatusCode, body: &str) -> AuthApiError {
    let detail = ApiErrorBody::parse_message(body);
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        AuthApiError::Unauthorized { detail }
    } else {
        AuthApiError::Rejected { status: status.as_u16(), detail }
    }
}

/// Classifies a failure to obtain a response at all.
pub fn map_transport_error(err: &reqwest::Error) -> AuthApiError {
    if err.is_timeout() {
        AuthApiError::Network(format!("request timed out: {err}"))
    } else if err.is_decode() {
        AuthApiError::Decode(err.to_string())
    } else {
        AuthApiError::Network(err.to_string())
    }
}

/// Whether a `Rejected` status is worth retrying later.
pub fn is_retryable_status(status: u16) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS.as_u16() || (500..600).contains(&status)
}
