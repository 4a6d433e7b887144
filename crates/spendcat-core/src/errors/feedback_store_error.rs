//! Feedback ledger errors.

use super::error_code::{self, SpendcatErrorCode};

/// Errors from the append-only feedback ledger.
#[derive(Debug, thiserror::Error)]
pub enum FeedbackStoreError {
    #[error("failed to write feedback ledger {path}: {message}")]
    Write { path: String, message: String },

    #[error("failed to read feedback ledger {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to encode feedback entry: {message}")]
    Encode { message: String },
}

impl SpendcatErrorCode for FeedbackStoreError {
    fn error_code(&self) -> &'static str {
        error_code::FEEDBACK_STORE_ERROR
    }
}
