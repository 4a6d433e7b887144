//! Classifier training configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Hyperparameters for the logistic regression fit.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TrainingConfig {
    /// Inverse regularization strength C. Default: 5.0.
    pub regularization: Option<f64>,
    /// Optimizer iteration cap. Default: 1000.
    pub max_iterations: Option<usize>,
    /// Max-abs gradient convergence threshold. Default: 1e-4.
    pub tolerance: Option<f64>,
    /// L-BFGS history length. Default: 10.
    pub history_size: Option<usize>,
}

impl TrainingConfig {
    pub fn effective_regularization(&self) -> f64 {
        self.regularization
            .unwrap_or(constants::DEFAULT_REGULARIZATION)
    }

    pub fn effective_max_iterations(&self) -> usize {
        self.max_iterations
            .unwrap_or(constants::DEFAULT_MAX_ITERATIONS)
    }

    pub fn effective_tolerance(&self) -> f64 {
        self.tolerance.unwrap_or(constants::DEFAULT_TOLERANCE)
    }

    pub fn effective_history_size(&self) -> usize {
        self.history_size.unwrap_or(constants::DEFAULT_HISTORY_SIZE)
    }
}
