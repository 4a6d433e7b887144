//! Storage locations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants;

/// Where the persisted model and the feedback ledger live.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Persisted model file. Default: `model.json`.
    pub model_path: Option<String>,
    /// Append-only feedback ledger. Default: `feedback.jsonl`.
    pub feedback_path: Option<String>,
}

impl StorageConfig {
    pub fn effective_model_path(&self) -> PathBuf {
        PathBuf::from(
            self.model_path
                .as_deref()
                .unwrap_or(constants::DEFAULT_MODEL_PATH),
        )
    }

    pub fn effective_feedback_path(&self) -> PathBuf {
        PathBuf::from(
            self.feedback_path
                .as_deref()
                .unwrap_or(constants::DEFAULT_FEEDBACK_PATH),
        )
    }
}
