//! # spendcat-model
//!
//! The learning half of spendcat: character n-gram TF-IDF features,
//! multinomial logistic regression fit by L-BFGS, and the immutable
//! [`Model`] that bundles both with its label set.

pub mod classifier;
pub mod features;
pub mod model;
pub mod trainer;

pub use classifier::{ClassifierParameters, FitReport, LogisticRegression};
pub use features::{FeatureVector, NgramVectorizer, Vocabulary};
pub use model::{Model, ModelShapeError};
pub use trainer::ModelTrainer;
