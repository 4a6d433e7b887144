//! Model persistence errors.

use super::error_code::{self, SpendcatErrorCode};

/// Errors from saving or loading a persisted model.
///
/// `NotFound` and `Corrupt` both mean "no model available": the engine
/// recovers by training from the seed dataset.
#[derive(Debug, thiserror::Error)]
pub enum ModelStoreError {
    #[error("no persisted model at {path}")]
    NotFound { path: String },

    #[error("persisted model at {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("model store I/O error at {path}: {message}")]
    Io { path: String, message: String },

    #[error("model serialization failed: {message}")]
    Serialization { message: String },
}

impl ModelStoreError {
    /// True when a caller should fall back to training a fresh model.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Corrupt { .. })
    }
}

impl SpendcatErrorCode for ModelStoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_code::MODEL_NOT_FOUND,
            Self::Corrupt { .. } => error_code::MODEL_CORRUPT,
            Self::Io { .. } | Self::Serialization { .. } => error_code::MODEL_STORE_ERROR,
        }
    }
}
