//! SpendcatErrorCode trait for the request-layer boundary.

/// Trait for mapping spendcat errors to stable error code strings.
/// Every error enum implements this so the request layer can pick a
/// status code without matching on variants.
pub trait SpendcatErrorCode {
    /// Returns the error code string (e.g., "NOT_READY").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted boundary string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants for the request-layer boundary.
pub const NOT_READY: &str = "NOT_READY";
pub const RETRAIN_IN_PROGRESS: &str = "RETRAIN_IN_PROGRESS";
pub const TRAINING_ERROR: &str = "TRAINING_ERROR";
pub const MODEL_CORRUPT: &str = "MODEL_CORRUPT";
pub const MODEL_NOT_FOUND: &str = "MODEL_NOT_FOUND";
pub const MODEL_STORE_ERROR: &str = "MODEL_STORE_ERROR";
pub const FEEDBACK_STORE_ERROR: &str = "FEEDBACK_STORE_ERROR";
pub const INVALID_CATEGORY: &str = "INVALID_CATEGORY";
pub const INVALID_FEEDBACK: &str = "INVALID_FEEDBACK";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
