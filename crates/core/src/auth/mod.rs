//! Remote authentication API boundary

pub mod ports;

pub use ports::{AuthApi, AuthApiError};
