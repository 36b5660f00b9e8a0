//! Domain types and models

pub mod session;
pub mod user;

pub use session::{SessionOperation, SessionPhase, SessionSnapshot, TokenPair};
pub use user::{
    LoginCredentials, PartialProfile, RegistrationRequest, SessionUser, UserProfile, UserType,
};
