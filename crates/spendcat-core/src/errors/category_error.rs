//! Category enumeration errors.

use super::error_code::{self, SpendcatErrorCode};

/// Errors raised when a string does not name a known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryError {
    #[error("unknown category slug '{slug}'")]
    UnknownSlug { slug: String },
}

impl SpendcatErrorCode for CategoryError {
    fn error_code(&self) -> &'static str {
        error_code::INVALID_CATEGORY
    }
}
