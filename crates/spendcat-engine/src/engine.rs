//! CategorizationEngine: owns the servable model and drives
//! initialize → predict / feedback → retrain.
//!
//! The servable model is an `Arc<Model>` behind an `RwLock`. Readers clone
//! the `Arc` and score outside the lock; a fit builds a complete new model,
//! persists it, and only then swaps the pointer. At most one fit runs at a
//! time; a second caller gets `RetrainInProgress`.

use std::sync::{Arc, Mutex, PoisonError, RwLock, TryLockError};

use serde::{Deserialize, Serialize};
use spendcat_core::errors::TrainingError;
use spendcat_core::{
    CategorySlug, EngineError, EngineResult, Prediction, SpendcatConfig, TrainingSample,
};
use spendcat_model::{Model, ModelTrainer};
use spendcat_storage::{FeedbackLedger, ModelStore};
use tracing::{debug, error, info, warn};

use crate::seed;

/// Lifecycle state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    /// No model yet; `predict` fails with `NotReady`.
    Uninitialized,
    /// First fit in progress; still no servable model.
    Training,
    /// A model is servable.
    Ready,
    /// A retrain is running; the previous model keeps serving.
    Retraining,
}

/// Readiness snapshot for health checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub state: EngineState,
    pub model_trained: bool,
    pub categories: Vec<CategorySlug>,
    pub feature_count: usize,
    pub training_sample_count: usize,
}

/// The transaction categorization engine. `Send + Sync`; share it in an `Arc`.
pub struct CategorizationEngine {
    config: SpendcatConfig,
    seed: Vec<TrainingSample>,
    trainer: ModelTrainer,
    store: ModelStore,
    ledger: FeedbackLedger,
    model: RwLock<Option<Arc<Model>>>,
    state: RwLock<EngineState>,
    fit_lock: Mutex<()>,
}

impl CategorizationEngine {
    /// Uninitialized engine with an explicit seed dataset.
    pub fn new(config: SpendcatConfig, seed: Vec<TrainingSample>) -> Self {
        let trainer = ModelTrainer::from_config(&config);
        let store = ModelStore::new(config.storage.effective_model_path());
        let ledger = FeedbackLedger::new(config.storage.effective_feedback_path());
        Self {
            config,
            seed,
            trainer,
            store,
            ledger,
            model: RwLock::new(None),
            state: RwLock::new(EngineState::Uninitialized),
            fit_lock: Mutex::new(()),
        }
    }

    /// Uninitialized engine using the built-in seed dataset.
    pub fn with_defaults(config: SpendcatConfig) -> Self {
        Self::new(config, seed::seed_samples())
    }

    pub fn config(&self) -> &SpendcatConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// The servable model, if any.
    pub fn current_model(&self) -> Option<Arc<Model>> {
        self.model
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Load the persisted model, or fit one from the seed if there is no
    /// usable model on disk.
    ///
    /// Does nothing if a model is already servable.
    pub fn initialize(&self) -> EngineResult<()> {
        let _fit = self.acquire_fit_lock()?;
        if self.current_model().is_some() {
            debug!("initialize called on a ready engine, nothing to do");
            return Ok(());
        }

        match self.store.load() {
            Ok(model) => {
                info!(
                    path = %self.store.path().display(),
                    labels = model.labels().len(),
                    features = model.feature_count(),
                    "loaded persisted model"
                );
                self.install(Arc::new(model));
                return Ok(());
            }
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "no usable persisted model, training from seed");
            }
            Err(e) => {
                error!(error = %e, "model store unreadable, training from seed");
            }
        }

        let prior = self.set_state(EngineState::Training);
        match self.fit_and_persist(&self.seed) {
            Ok(model) => {
                self.install(model);
                Ok(())
            }
            Err(e) => {
                self.set_state(prior);
                Err(e)
            }
        }
    }

    /// Classify `text` with the servable model.
    pub fn predict(&self, text: &str) -> EngineResult<Prediction> {
        let model = self.current_model().ok_or(EngineError::NotReady)?;
        Ok(model.predict(text))
    }

    /// Validate and record a user correction for the next retrain.
    pub fn append_feedback(&self, text: &str, label: &str) -> EngineResult<()> {
        let label: CategorySlug = label.parse()?;
        let text = text.trim();
        if text.is_empty() {
            return Err(EngineError::InvalidFeedback {
                reason: "description is empty".to_string(),
            });
        }
        let max = self.config.feedback.effective_max_text_length();
        let len = text.chars().count();
        if len > max {
            return Err(EngineError::InvalidFeedback {
                reason: format!("description is {len} characters, limit is {max}"),
            });
        }

        self.ledger.append(text, label)?;
        info!(label = %label, chars = len, "feedback recorded");
        Ok(())
    }

    /// Refit on seed + ledger and swap the result in.
    ///
    /// Returns the number of samples used. On failure the previous model
    /// stays active.
    pub fn retrain(&self) -> EngineResult<usize> {
        let _fit = self.acquire_fit_lock()?;
        if self.current_model().is_none() {
            return Err(EngineError::NotReady);
        }

        let prior = self.set_state(EngineState::Retraining);
        let result = self
            .collect_samples()
            .and_then(|samples| Ok((self.fit_and_persist(&samples)?, samples.len())));

        match result {
            Ok((model, count)) => {
                self.install(model);
                info!(samples = count, "retrain complete");
                Ok(count)
            }
            Err(e) => {
                self.set_state(prior);
                warn!(error = %e, "retrain failed, keeping the previous model");
                Err(e)
            }
        }
    }

    /// Readiness snapshot.
    pub fn status(&self) -> EngineStatus {
        let state = self.state();
        match self.current_model() {
            Some(model) => EngineStatus {
                state,
                model_trained: true,
                categories: model.labels().to_vec(),
                feature_count: model.feature_count(),
                training_sample_count: model.training_sample_count(),
            },
            None => EngineStatus {
                state,
                model_trained: false,
                categories: Vec::new(),
                feature_count: 0,
                training_sample_count: 0,
            },
        }
    }

    fn acquire_fit_lock(&self) -> EngineResult<std::sync::MutexGuard<'_, ()>> {
        match self.fit_lock.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::Poisoned(poisoned)) => Ok(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => Err(EngineError::RetrainInProgress),
        }
    }

    /// Seed followed by every usable ledger entry, in file order.
    fn collect_samples(&self) -> EngineResult<Vec<TrainingSample>> {
        let unreadable = |message: String| TrainingError::LedgerUnreadable {
            path: self.ledger.path().display().to_string(),
            message,
        };

        let mut samples = self.seed.clone();
        let mut reader = self
            .ledger
            .read_all()
            .map_err(|e| unreadable(e.to_string()))?;
        let mut accepted = 0usize;
        let mut discarded = 0usize;
        for entry in reader.by_ref() {
            let entry = entry.map_err(|e| unreadable(e.to_string()))?;
            match entry.to_sample() {
                Some(sample) => {
                    samples.push(sample);
                    accepted += 1;
                }
                None => {
                    discarded += 1;
                    warn!(label = %entry.label, "discarding feedback entry with unknown label or blank text");
                }
            }
        }

        info!(
            seed = self.seed.len(),
            feedback = accepted,
            discarded,
            malformed = reader.skipped(),
            "collected training samples"
        );
        Ok(samples)
    }

    fn fit_and_persist(&self, samples: &[TrainingSample]) -> EngineResult<Arc<Model>> {
        let (model, _report) = self.trainer.fit(samples)?;
        self.store.save(&model)?;
        Ok(Arc::new(model))
    }

    fn install(&self, model: Arc<Model>) {
        *self.model.write().unwrap_or_else(PoisonError::into_inner) = Some(model);
        self.set_state(EngineState::Ready);
    }

    /// Set the state, returning the previous one.
    fn set_state(&self, next: EngineState) -> EngineState {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *state, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendcat_core::config::StorageConfig;

    fn engine_in(dir: &std::path::Path, seed: Vec<TrainingSample>) -> CategorizationEngine {
        let config = SpendcatConfig {
            storage: StorageConfig {
                model_path: Some(dir.join("model.json").display().to_string()),
                feedback_path: Some(dir.join("feedback.jsonl").display().to_string()),
            },
            ..SpendcatConfig::default()
        };
        CategorizationEngine::new(config, seed)
    }

    fn tiny_seed() -> Vec<TrainingSample> {
        vec![
            TrainingSample::new("coffee", CategorySlug::FoodDining),
            TrainingSample::new("taxi", CategorySlug::Transport),
        ]
    }

    #[test]
    fn predict_before_initialize_is_not_ready() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(dir.path(), tiny_seed());
        assert_eq!(engine.state(), EngineState::Uninitialized);
        assert!(matches!(engine.predict("coffee"), Err(EngineError::NotReady)));
        assert!(matches!(engine.retrain(), Err(EngineError::NotReady)));
        assert!(!engine.status().model_trained);
    }

    #[test]
    fn single_class_seed_leaves_engine_uninitialized() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(
            dir.path(),
            vec![TrainingSample::new("coffee", CategorySlug::FoodDining)],
        );
        let err = engine.initialize().unwrap_err();
        assert!(matches!(
            err,
            EngineError::Training(TrainingError::InsufficientClasses { found: 1 })
        ));
        assert_eq!(engine.state(), EngineState::Uninitialized);
        assert!(engine.current_model().is_none());
    }

    #[test]
    fn initialize_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(dir.path(), tiny_seed());
        engine.initialize().unwrap();
        let first = engine.current_model().unwrap();
        engine.initialize().unwrap();
        assert!(Arc::ptr_eq(&first, &engine.current_model().unwrap()));
    }

    #[test]
    fn padded_text_predicts_like_trimmed_text() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(dir.path(), tiny_seed());
        engine.initialize().unwrap();

        let padded = engine.predict("  \tcoffee \n").unwrap();
        let plain = engine.predict("coffee").unwrap();
        assert_eq!(padded, plain);
        assert_eq!(plain.category, CategorySlug::FoodDining);
    }

    #[test]
    fn busy_fit_lock_rejects_retrain() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(dir.path(), tiny_seed());
        engine.initialize().unwrap();

        let _held = engine.acquire_fit_lock().unwrap();
        assert!(matches!(engine.retrain(), Err(EngineError::RetrainInProgress)));
        assert_eq!(engine.state(), EngineState::Ready);
    }

    #[test]
    fn feedback_text_limits() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(dir.path(), tiny_seed());

        assert!(matches!(
            engine.append_feedback("   ", "transport"),
            Err(EngineError::InvalidFeedback { .. })
        ));
        let long = "x".repeat(501);
        assert!(matches!(
            engine.append_feedback(&long, "transport"),
            Err(EngineError::InvalidFeedback { .. })
        ));
        let exact = "é".repeat(500);
        engine.append_feedback(&exact, "transport").unwrap();
    }
}
