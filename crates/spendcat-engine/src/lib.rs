//! # spendcat-engine
//!
//! The categorization engine: loads or trains the servable model, classifies
//! descriptions, records corrections, and folds them back in on retrain.

pub mod engine;
pub mod seed;

pub use engine::{CategorizationEngine, EngineState, EngineStatus};
pub use seed::{seed_samples, SEED_SAMPLES};
