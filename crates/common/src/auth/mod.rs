//! Bearer-token helpers
//!
//! Wild Welcome's API issues JWT access tokens and, optionally, refresh
//! tokens. The client never verifies signatures; it only reads claims to
//! recover the account identity when the profile endpoint is unavailable.
//!
//! # Module Organization
//!
//! - **[`types`]**: Token endpoint wire types (`TokenResponse`,
//!   `ApiErrorBody`)
//! - **[`claims`]**: Unverified JWT claim decoding (`TokenClaims`)

pub mod claims;
pub mod types;

// Re-export commonly used types and functions
pub use claims::{decode_unverified_claims, ClaimsError, TokenClaims};
pub use types::{ApiErrorBody, TokenResponse};
