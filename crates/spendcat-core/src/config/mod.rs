//! Configuration system for spendcat.
//! TOML-based, layered resolution: overrides > env > project > defaults.

pub mod feature_config;
pub mod feedback_config;
pub mod spendcat_config;
pub mod storage_config;
pub mod training_config;

pub use feature_config::FeatureConfig;
pub use feedback_config::FeedbackConfig;
pub use spendcat_config::{ConfigOverrides, SpendcatConfig};
pub use storage_config::StorageConfig;
pub use training_config::TrainingConfig;
