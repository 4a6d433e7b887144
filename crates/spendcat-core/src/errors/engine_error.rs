//! Engine-level errors surfaced to the request layer.

use super::error_code::{self, SpendcatErrorCode};
use super::{CategoryError, ConfigError, FeedbackStoreError, ModelStoreError, TrainingError};

/// Errors returned by the categorization engine.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("classifier is not ready yet, retry shortly")]
    NotReady,

    #[error("a retrain is already in progress")]
    RetrainInProgress,

    #[error("invalid feedback: {reason}")]
    InvalidFeedback { reason: String },

    #[error("Category error: {0}")]
    Category(#[from] CategoryError),

    #[error("Training error: {0}")]
    Training(#[from] TrainingError),

    #[error("Model store error: {0}")]
    ModelStore(#[from] ModelStoreError),

    #[error("Feedback store error: {0}")]
    FeedbackStore(#[from] FeedbackStoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SpendcatErrorCode for EngineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotReady => error_code::NOT_READY,
            Self::RetrainInProgress => error_code::RETRAIN_IN_PROGRESS,
            Self::InvalidFeedback { .. } => error_code::INVALID_FEEDBACK,
            Self::Category(e) => e.error_code(),
            Self::Training(e) => e.error_code(),
            Self::ModelStore(e) => e.error_code(),
            Self::FeedbackStore(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;
