//! Multinomial logistic regression over sparse n-gram features.
//!
//! `softmax(W·x + b)` with one weight row and intercept per class, fit by
//! L-BFGS on the class-balanced, L2-regularized cross-entropy.

pub mod lbfgs;
mod objective;

use std::collections::BTreeSet;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use spendcat_core::config::TrainingConfig;
use spendcat_core::errors::TrainingError;
use spendcat_core::CategorySlug;

use crate::features::FeatureVector;
use lbfgs::{LbfgsSettings, StopReason};
use objective::SoftmaxObjective;

/// Per-class weight rows and intercepts. Row `k` belongs to the `k`-th label
/// of the owning model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierParameters {
    pub weights: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl ClassifierParameters {
    pub fn n_classes(&self) -> usize {
        self.intercepts.len()
    }

    /// Normalized class probabilities for `x`, in row order.
    pub fn probabilities(&self, x: &FeatureVector) -> Vec<f64> {
        let mut scores: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.intercepts)
            .map(|(row, b)| x.dot(row) + b)
            .collect();
        softmax_in_place(&mut scores);
        scores
    }
}

/// Diagnostics from a classifier fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitReport {
    pub iterations: usize,
    pub objective: f64,
    pub converged: bool,
    pub duration_ms: u64,
}

/// Trainer holding the fixed hyperparameters.
#[derive(Debug, Clone, Copy)]
pub struct LogisticRegression {
    /// Inverse regularization strength.
    pub regularization: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub history_size: usize,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::from_config(&TrainingConfig::default())
    }
}

impl LogisticRegression {
    pub fn from_config(config: &TrainingConfig) -> Self {
        Self {
            regularization: config.effective_regularization(),
            max_iterations: config.effective_max_iterations(),
            tolerance: config.effective_tolerance(),
            history_size: config.effective_history_size(),
        }
    }

    /// Fit on `features` with `labels`, where every vector lives in a space of
    /// `n_features` dimensions.
    ///
    /// Returns the sorted distinct labels, the parameters in that label order,
    /// and a fit report.
    pub fn fit(
        &self,
        features: &[FeatureVector],
        labels: &[CategorySlug],
        n_features: usize,
    ) -> Result<(Vec<CategorySlug>, ClassifierParameters, FitReport), TrainingError> {
        if features.is_empty() || labels.is_empty() {
            return Err(TrainingError::EmptyTrainingSet);
        }
        if features.len() != labels.len() {
            return Err(TrainingError::LengthMismatch {
                features: features.len(),
                labels: labels.len(),
            });
        }
        if !(self.regularization.is_finite() && self.regularization > 0.0) {
            return Err(TrainingError::InvalidSettings {
                message: format!("regularization must be positive, got {}", self.regularization),
            });
        }

        if let Some(index) = features.iter().filter_map(FeatureVector::max_index).max() {
            if index as usize >= n_features {
                return Err(TrainingError::FeatureIndexOutOfRange {
                    index: index as usize,
                    n_features,
                });
            }
        }

        let classes: Vec<CategorySlug> = labels
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if classes.len() < 2 {
            return Err(TrainingError::InsufficientClasses {
                found: classes.len(),
            });
        }
        let targets: Vec<usize> = labels
            .iter()
            .map(|l| classes.binary_search(l).unwrap_or_default())
            .collect();

        let started = Instant::now();
        let objective = SoftmaxObjective::new(
            features,
            &targets,
            classes.len(),
            n_features,
            self.regularization,
        );
        let settings = LbfgsSettings {
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
            history_size: self.history_size,
        };
        let outcome = lbfgs::minimize(
            |theta, grad| objective.evaluate(theta, grad),
            vec![0.0; objective.dimension()],
            &settings,
        )?;

        let stride = objective.stride();
        let mut weights = Vec::with_capacity(classes.len());
        let mut intercepts = Vec::with_capacity(classes.len());
        for block in outcome.x.chunks_exact(stride) {
            weights.push(block[..n_features].to_vec());
            intercepts.push(block[n_features]);
        }

        let report = FitReport {
            iterations: outcome.iterations,
            objective: outcome.objective,
            converged: outcome.stop_reason.converged(),
            duration_ms: started.elapsed().as_millis() as u64,
        };
        match outcome.stop_reason {
            StopReason::MaxIterations => tracing::warn!(
                iterations = report.iterations,
                objective = report.objective,
                "classifier hit the iteration cap before converging"
            ),
            StopReason::LineSearchFailed => tracing::warn!(
                iterations = report.iterations,
                objective = report.objective,
                "classifier line search stalled"
            ),
            _ => tracing::debug!(
                iterations = report.iterations,
                objective = report.objective,
                "classifier converged"
            ),
        }

        Ok((classes, ClassifierParameters { weights, intercepts }, report))
    }
}

/// Replace `scores` with `softmax(scores)`; returns `logsumexp(scores)`.
pub fn softmax_in_place(scores: &mut [f64]) -> f64 {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        let uniform = 1.0 / scores.len() as f64;
        scores.fill(uniform);
        return max;
    }
    let mut sum = 0.0;
    for s in scores.iter_mut() {
        *s = (*s - max).exp();
        sum += *s;
    }
    for s in scores.iter_mut() {
        *s /= sum;
    }
    max + sum.ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::NgramVectorizer;

    fn fit_texts(
        pairs: &[(&str, CategorySlug)],
    ) -> (
        crate::features::Vocabulary,
        Vec<CategorySlug>,
        ClassifierParameters,
        FitReport,
    ) {
        let texts: Vec<&str> = pairs.iter().map(|(t, _)| *t).collect();
        let labels: Vec<CategorySlug> = pairs.iter().map(|(_, l)| *l).collect();
        let (vocab, features) = NgramVectorizer::default().fit_transform(&texts).unwrap();
        let (classes, params, report) = LogisticRegression::default()
            .fit(&features, &labels, vocab.len())
            .unwrap();
        (vocab, classes, params, report)
    }

    #[test]
    fn softmax_sums_to_one_and_is_shift_invariant() {
        let mut a = vec![1.0, 2.0, 3.0];
        let mut b = vec![1001.0, 1002.0, 1003.0];
        let lse = softmax_in_place(&mut a);
        softmax_in_place(&mut b);
        assert!((a.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-12);
        }
        let expected = (1f64.exp() + 2f64.exp() + 3f64.exp()).ln();
        assert!((lse - expected).abs() < 1e-12);
    }

    #[test]
    fn single_class_is_rejected() {
        let (_, features) = NgramVectorizer::default()
            .fit_transform(&["uber", "bolt"])
            .unwrap();
        let err = LogisticRegression::default()
            .fit(
                &features,
                &[CategorySlug::Transport, CategorySlug::Transport],
                10,
            )
            .unwrap_err();
        assert!(matches!(err, TrainingError::InsufficientClasses { found: 1 }));
    }

    #[test]
    fn empty_and_mismatched_inputs_are_rejected() {
        let lr = LogisticRegression::default();
        assert!(matches!(
            lr.fit(&[], &[], 0),
            Err(TrainingError::EmptyTrainingSet)
        ));
        let err = lr
            .fit(
                &[FeatureVector::default()],
                &[CategorySlug::Other, CategorySlug::Health],
                0,
            )
            .unwrap_err();
        assert!(matches!(err, TrainingError::LengthMismatch { .. }));
    }

    #[test]
    fn feature_space_narrower_than_vectors_is_rejected() {
        let (vocab, features) = NgramVectorizer::default()
            .fit_transform(&["java house coffee", "uber trip"])
            .unwrap();
        let labels = [CategorySlug::FoodDining, CategorySlug::Transport];
        let lr = LogisticRegression::default();

        let err = lr.fit(&features, &labels, 3).unwrap_err();
        assert!(matches!(
            err,
            TrainingError::FeatureIndexOutOfRange { n_features: 3, .. }
        ));
        // One short of the vocabulary would alias the last feature onto the intercept.
        let err = lr.fit(&features, &labels, vocab.len() - 1).unwrap_err();
        assert!(matches!(err, TrainingError::FeatureIndexOutOfRange { .. }));
        assert!(lr.fit(&features, &labels, vocab.len()).is_ok());
    }

    #[test]
    fn separable_data_is_learned() {
        let pairs = [
            ("java house coffee", CategorySlug::FoodDining),
            ("kfc chicken meal", CategorySlug::FoodDining),
            ("uber trip", CategorySlug::Transport),
            ("matatu fare", CategorySlug::Transport),
            ("kplc prepaid tokens", CategorySlug::Utilities),
            ("nairobi water bill", CategorySlug::Utilities),
        ];
        let (vocab, classes, params, report) = fit_texts(&pairs);
        assert!(report.converged);
        assert_eq!(
            classes,
            vec![
                CategorySlug::FoodDining,
                CategorySlug::Transport,
                CategorySlug::Utilities
            ]
        );
        for (text, label) in pairs {
            let probs = params.probabilities(&vocab.transform(text));
            let best = probs
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .map(|(i, _)| i)
                .unwrap();
            assert_eq!(classes[best], label, "misclassified {text:?}");
        }
    }

    #[test]
    fn fit_is_deterministic() {
        let pairs = [
            ("java house coffee", CategorySlug::FoodDining),
            ("uber trip", CategorySlug::Transport),
            ("uber eats order", CategorySlug::FoodDining),
        ];
        let (_, _, a, _) = fit_texts(&pairs);
        let (_, _, b, _) = fit_texts(&pairs);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_vector_scores_by_intercept_only() {
        let pairs = [
            ("java house coffee", CategorySlug::FoodDining),
            ("uber trip", CategorySlug::Transport),
        ];
        let (_, _, params, _) = fit_texts(&pairs);
        let probs = params.probabilities(&FeatureVector::default());
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }
}
