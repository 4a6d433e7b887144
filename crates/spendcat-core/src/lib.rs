//! # spendcat-core
//!
//! Foundation crate for the spendcat transaction classifier.
//! Defines the closed category enumeration, shared sample/prediction types,
//! errors, config, tracing setup, and constants.
//! Every other crate in the workspace depends on this.

pub mod category;
pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

pub use category::CategorySlug;
pub use config::SpendcatConfig;
pub use errors::{EngineError, EngineResult, SpendcatErrorCode};
pub use types::{FeedbackEntry, Prediction, ScoreDistribution, TrainingSample};
