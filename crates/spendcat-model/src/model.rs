//! The fitted model: vocabulary + classifier parameters + label set.
//!
//! A `Model` is immutable once built. Every fit produces a fresh,
//! self-consistent value; callers swap whole models, never patch one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spendcat_core::{CategorySlug, Prediction, ScoreDistribution};

use crate::classifier::ClassifierParameters;
use crate::features::Vocabulary;

/// Structural problems that make a set of parts unusable as a model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelShapeError {
    #[error("model needs at least 2 labels, has {found}")]
    TooFewLabels { found: usize },

    #[error("labels must be sorted and distinct")]
    UnorderedLabels,

    #[error("{labels} labels but {rows} weight rows and {intercepts} intercepts")]
    ClassCountMismatch {
        labels: usize,
        rows: usize,
        intercepts: usize,
    },

    #[error("weight row {row} has width {width}, vocabulary has {vocabulary} features")]
    DimensionMismatch {
        row: usize,
        width: usize,
        vocabulary: usize,
    },

    #[error("non-finite parameter in row {row}")]
    NonFiniteParameter { row: usize },
}

/// A servable classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ModelRepr", into = "ModelRepr")]
pub struct Model {
    vocabulary: Vocabulary,
    parameters: ClassifierParameters,
    labels: Vec<CategorySlug>,
    training_sample_count: usize,
    trained_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
struct ModelRepr {
    labels: Vec<CategorySlug>,
    training_sample_count: usize,
    trained_at: DateTime<Utc>,
    vocabulary: Vocabulary,
    parameters: ClassifierParameters,
}

impl TryFrom<ModelRepr> for Model {
    type Error = ModelShapeError;

    fn try_from(repr: ModelRepr) -> Result<Self, Self::Error> {
        Model::from_parts(
            repr.vocabulary,
            repr.parameters,
            repr.labels,
            repr.training_sample_count,
            repr.trained_at,
        )
    }
}

impl From<Model> for ModelRepr {
    fn from(model: Model) -> Self {
        Self {
            labels: model.labels,
            training_sample_count: model.training_sample_count,
            trained_at: model.trained_at,
            vocabulary: model.vocabulary,
            parameters: model.parameters,
        }
    }
}

impl Model {
    /// Assemble a model, checking that the parts agree with each other.
    pub fn from_parts(
        vocabulary: Vocabulary,
        parameters: ClassifierParameters,
        labels: Vec<CategorySlug>,
        training_sample_count: usize,
        trained_at: DateTime<Utc>,
    ) -> Result<Self, ModelShapeError> {
        if labels.len() < 2 {
            return Err(ModelShapeError::TooFewLabels {
                found: labels.len(),
            });
        }
        if !labels.windows(2).all(|w| w[0] < w[1]) {
            return Err(ModelShapeError::UnorderedLabels);
        }
        if parameters.weights.len() != labels.len() || parameters.intercepts.len() != labels.len()
        {
            return Err(ModelShapeError::ClassCountMismatch {
                labels: labels.len(),
                rows: parameters.weights.len(),
                intercepts: parameters.intercepts.len(),
            });
        }
        for (row, (weights, intercept)) in parameters
            .weights
            .iter()
            .zip(&parameters.intercepts)
            .enumerate()
        {
            if weights.len() != vocabulary.len() {
                return Err(ModelShapeError::DimensionMismatch {
                    row,
                    width: weights.len(),
                    vocabulary: vocabulary.len(),
                });
            }
            if !intercept.is_finite() || weights.iter().any(|w| !w.is_finite()) {
                return Err(ModelShapeError::NonFiniteParameter { row });
            }
        }

        Ok(Self {
            vocabulary,
            parameters,
            labels,
            training_sample_count,
            trained_at,
        })
    }

    /// Classify `text`: arg-max label, its probability, and the full
    /// distribution over this model's labels.
    pub fn predict(&self, text: &str) -> Prediction {
        let features = self.vocabulary.transform(text.trim());
        let probs = self.parameters.probabilities(&features);
        let scores: ScoreDistribution = self.labels.iter().copied().zip(probs).collect();
        // `labels` has at least two entries, so `top` is always present.
        let (category, confidence) = scores.top().unwrap_or((self.labels[0], 0.0));
        Prediction {
            category,
            confidence,
            scores,
        }
    }

    /// Labels seen during the fit, sorted.
    pub fn labels(&self) -> &[CategorySlug] {
        &self.labels
    }

    /// Size of the feature space.
    pub fn feature_count(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn training_sample_count(&self) -> usize {
        self.training_sample_count
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn parameters(&self) -> &ClassifierParameters {
        &self.parameters
    }
}
