//! Feature extraction configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for the character n-gram vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FeatureConfig {
    /// Shortest n-gram length. Default: 2.
    pub ngram_min: Option<usize>,
    /// Longest n-gram length. Default: 4.
    pub ngram_max: Option<usize>,
    /// Vocabulary cap. Default: 30,000.
    pub max_features: Option<usize>,
}

impl FeatureConfig {
    /// Returns the effective minimum n-gram length, defaulting to 2.
    pub fn effective_ngram_min(&self) -> usize {
        self.ngram_min.unwrap_or(constants::DEFAULT_NGRAM_MIN)
    }

    /// Returns the effective maximum n-gram length, defaulting to 4.
    pub fn effective_ngram_max(&self) -> usize {
        self.ngram_max.unwrap_or(constants::DEFAULT_NGRAM_MAX)
    }

    /// Returns the effective vocabulary cap, defaulting to 30,000.
    pub fn effective_max_features(&self) -> usize {
        self.max_features.unwrap_or(constants::DEFAULT_MAX_FEATURES)
    }
}
