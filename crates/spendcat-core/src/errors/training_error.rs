//! Model fitting errors.

use super::error_code::{self, SpendcatErrorCode};

/// Errors that abort a fit. The previously servable model, if any, stays active.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("need at least 2 distinct labels to train, found {found}")]
    InsufficientClasses { found: usize },

    #[error("feature/label count mismatch: {features} feature vectors, {labels} labels")]
    LengthMismatch { features: usize, labels: usize },

    #[error("invalid vectorizer settings: {message}")]
    InvalidSettings { message: String },

    #[error("feature index {index} is outside a {n_features}-dimensional feature space")]
    FeatureIndexOutOfRange { index: usize, n_features: usize },

    #[error("optimizer diverged at iteration {iteration}: objective is not finite")]
    NonFiniteObjective { iteration: usize },

    #[error("fitted parts do not form a valid model: {message}")]
    InconsistentModel { message: String },

    #[error("feedback ledger {path} is unreadable: {message}")]
    LedgerUnreadable { path: String, message: String },
}

impl SpendcatErrorCode for TrainingError {
    fn error_code(&self) -> &'static str {
        error_code::TRAINING_ERROR
    }
}
