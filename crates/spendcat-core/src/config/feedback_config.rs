//! Feedback validation configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Longest accepted description in characters. Default: 500.
    pub max_text_length: Option<usize>,
}

impl FeedbackConfig {
    pub fn effective_max_text_length(&self) -> usize {
        self.max_text_length
            .unwrap_or(constants::DEFAULT_MAX_TEXT_LENGTH)
    }
}
