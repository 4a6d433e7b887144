//! Top-level spendcat configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{FeatureConfig, FeedbackConfig, StorageConfig, TrainingConfig};
use crate::constants;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Programmatic overrides (applied via `apply_overrides`)
/// 2. Environment variables (`SPENDCAT_*`)
/// 3. Project config (`spendcat.toml` in the project root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SpendcatConfig {
    pub features: FeatureConfig,
    pub training: TrainingConfig,
    pub storage: StorageConfig,
    pub feedback: FeedbackConfig,
}

/// Overrides supplied by the embedding process (highest priority).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub model_path: Option<String>,
    pub feedback_path: Option<String>,
    pub max_features: Option<usize>,
    pub max_iterations: Option<usize>,
}

impl SpendcatConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 3: project config
        let project_config_path = root.join(constants::PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): programmatic overrides
        if let Some(o) = overrides {
            Self::apply_overrides(&mut config, o);
        }

        Self::validate(&config)?;
        tracing::debug!(
            model_path = %config.storage.effective_model_path().display(),
            feedback_path = %config.storage.effective_feedback_path().display(),
            "configuration resolved"
        );
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &SpendcatConfig) -> Result<(), ConfigError> {
        let ngram_min = config.features.effective_ngram_min();
        let ngram_max = config.features.effective_ngram_max();
        if ngram_min == 0 {
            return Err(invalid("features.ngram_min", "must be at least 1"));
        }
        if ngram_min > ngram_max {
            return Err(invalid(
                "features.ngram_max",
                "must be greater than or equal to ngram_min",
            ));
        }
        if config.features.effective_max_features() == 0 {
            return Err(invalid("features.max_features", "must be greater than 0"));
        }

        let c = config.training.effective_regularization();
        if !(c.is_finite() && c > 0.0) {
            return Err(invalid("training.regularization", "must be a positive number"));
        }
        if config.training.effective_max_iterations() == 0 {
            return Err(invalid("training.max_iterations", "must be greater than 0"));
        }
        let tol = config.training.effective_tolerance();
        if !(tol.is_finite() && tol > 0.0) {
            return Err(invalid("training.tolerance", "must be a positive number"));
        }
        if config.training.effective_history_size() == 0 {
            return Err(invalid("training.history_size", "must be greater than 0"));
        }

        if config.feedback.effective_max_text_length() == 0 {
            return Err(invalid("feedback.max_text_length", "must be greater than 0"));
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut SpendcatConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: SpendcatConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` value.
    fn merge(base: &mut SpendcatConfig, other: &SpendcatConfig) {
        // Features
        if other.features.ngram_min.is_some() {
            base.features.ngram_min = other.features.ngram_min;
        }
        if other.features.ngram_max.is_some() {
            base.features.ngram_max = other.features.ngram_max;
        }
        if other.features.max_features.is_some() {
            base.features.max_features = other.features.max_features;
        }

        // Training
        if other.training.regularization.is_some() {
            base.training.regularization = other.training.regularization;
        }
        if other.training.max_iterations.is_some() {
            base.training.max_iterations = other.training.max_iterations;
        }
        if other.training.tolerance.is_some() {
            base.training.tolerance = other.training.tolerance;
        }
        if other.training.history_size.is_some() {
            base.training.history_size = other.training.history_size;
        }

        // Storage
        if other.storage.model_path.is_some() {
            base.storage.model_path = other.storage.model_path.clone();
        }
        if other.storage.feedback_path.is_some() {
            base.storage.feedback_path = other.storage.feedback_path.clone();
        }

        // Feedback
        if other.feedback.max_text_length.is_some() {
            base.feedback.max_text_length = other.feedback.max_text_length;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `SPENDCAT_MODEL_PATH`, `SPENDCAT_MAX_FEATURES`, etc.
    /// Unparseable numeric values are ignored.
    fn apply_env_overrides(config: &mut SpendcatConfig) {
        if let Ok(val) = std::env::var("SPENDCAT_MODEL_PATH") {
            config.storage.model_path = Some(val);
        }
        if let Ok(val) = std::env::var("SPENDCAT_FEEDBACK_PATH") {
            config.storage.feedback_path = Some(val);
        }
        if let Ok(val) = std::env::var("SPENDCAT_MAX_FEATURES") {
            if let Ok(v) = val.parse::<usize>() {
                config.features.max_features = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SPENDCAT_MAX_ITERATIONS") {
            if let Ok(v) = val.parse::<usize>() {
                config.training.max_iterations = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SPENDCAT_REGULARIZATION") {
            if let Ok(v) = val.parse::<f64>() {
                config.training.regularization = Some(v);
            }
        }
    }

    /// Apply programmatic overrides (highest priority).
    pub fn apply_overrides(config: &mut SpendcatConfig, overrides: &ConfigOverrides) {
        if let Some(ref v) = overrides.model_path {
            config.storage.model_path = Some(v.clone());
        }
        if let Some(ref v) = overrides.feedback_path {
            config.storage.feedback_path = Some(v.clone());
        }
        if let Some(v) = overrides.max_features {
            config.features.max_features = Some(v);
        }
        if let Some(v) = overrides.max_iterations {
            config.training.max_iterations = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
