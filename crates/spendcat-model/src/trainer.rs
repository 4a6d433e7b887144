//! ModelTrainer: vectorizer + classifier fit over a labelled corpus.

use chrono::Utc;
use spendcat_core::errors::TrainingError;
use spendcat_core::{CategorySlug, SpendcatConfig, TrainingSample};
use tracing::info;

use crate::classifier::{FitReport, LogisticRegression};
use crate::features::NgramVectorizer;
use crate::model::Model;

/// Fits complete models from training samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelTrainer {
    vectorizer: NgramVectorizer,
    classifier: LogisticRegression,
}

impl ModelTrainer {
    pub fn new(vectorizer: NgramVectorizer, classifier: LogisticRegression) -> Self {
        Self {
            vectorizer,
            classifier,
        }
    }

    pub fn from_config(config: &SpendcatConfig) -> Self {
        Self {
            vectorizer: NgramVectorizer::from_config(&config.features),
            classifier: LogisticRegression::from_config(&config.training),
        }
    }

    /// Fit a fresh vocabulary and classifier on `samples`.
    ///
    /// Nothing is shared with any earlier model; the result is a complete,
    /// validated replacement.
    pub fn fit(&self, samples: &[TrainingSample]) -> Result<(Model, FitReport), TrainingError> {
        if samples.is_empty() {
            return Err(TrainingError::EmptyTrainingSet);
        }
        let texts: Vec<&str> = samples.iter().map(|s| s.text.trim()).collect();
        let labels: Vec<CategorySlug> = samples.iter().map(|s| s.label).collect();

        let (vocabulary, features) = self.vectorizer.fit_transform(&texts)?;
        let (classes, parameters, report) =
            self.classifier
                .fit(&features, &labels, vocabulary.len())?;

        let model = Model::from_parts(vocabulary, parameters, classes, samples.len(), Utc::now())
            .map_err(|e| TrainingError::InconsistentModel {
                message: e.to_string(),
            })?;

        info!(
            samples = samples.len(),
            labels = model.labels().len(),
            features = model.feature_count(),
            iterations = report.iterations,
            converged = report.converged,
            duration_ms = report.duration_ms,
            "model fitted"
        );
        Ok((model, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<TrainingSample> {
        vec![
            TrainingSample::new("Java House coffee", CategorySlug::FoodDining),
            TrainingSample::new("KFC lunch", CategorySlug::FoodDining),
            TrainingSample::new("Uber trip to town", CategorySlug::Transport),
            TrainingSample::new("matatu fare", CategorySlug::Transport),
        ]
    }

    #[test]
    fn fit_records_sample_count_and_labels() {
        let (model, report) = ModelTrainer::default().fit(&corpus()).unwrap();
        assert_eq!(model.training_sample_count(), 4);
        assert_eq!(
            model.labels(),
            &[CategorySlug::FoodDining, CategorySlug::Transport]
        );
        assert!(model.feature_count() > 0);
        assert!(report.iterations > 0);
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let err = ModelTrainer::default().fit(&[]).unwrap_err();
        assert!(matches!(err, TrainingError::EmptyTrainingSet));
    }

    #[test]
    fn trainer_honours_config() {
        let mut config = SpendcatConfig::default();
        config.features.max_features = Some(5);
        let (model, _) = ModelTrainer::from_config(&config).fit(&corpus()).unwrap();
        assert_eq!(model.feature_count(), 5);
    }
}
