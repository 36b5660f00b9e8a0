//! Storage error types

use thiserror::Error;

/// Storage error type
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("Keychain error: {0}")]
    Keychain(String),

    #[error("Write rejected for key '{key}': {reason}")]
    WriteRejected { key: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl StorageError {
    /// Whether retrying the same operation might succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unavailable(_) | Self::Keychain(_) => true,
            Self::Io(err) => matches!(
                err.kind(),
                std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::WouldBlock
                    | std::io::ErrorKind::TimedOut
            ),
            Self::WriteRejected { .. } | Self::SerdeJson(_) => false,
        }
    }
}

/// Storage result type
pub type StorageResult<T> = Result<T, StorageError>;
