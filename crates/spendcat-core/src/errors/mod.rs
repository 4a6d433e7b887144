//! Error handling for spendcat.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod category_error;
pub mod config_error;
pub mod engine_error;
pub mod error_code;
pub mod feedback_store_error;
pub mod model_store_error;
pub mod training_error;

pub use category_error::CategoryError;
pub use config_error::ConfigError;
pub use engine_error::{EngineError, EngineResult};
pub use error_code::SpendcatErrorCode;
pub use feedback_store_error::FeedbackStoreError;
pub use model_store_error::ModelStoreError;
pub use training_error::TrainingError;
