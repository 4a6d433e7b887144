//! Sample, feedback, and prediction types shared across crates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::category::CategorySlug;

/// One labelled description used to fit a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub text: String,
    pub label: CategorySlug,
}

impl TrainingSample {
    pub fn new(text: impl Into<String>, label: CategorySlug) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// A user correction as stored in the feedback ledger.
///
/// `label` stays a raw string here: ledger lines may predate the current
/// enumeration and are re-validated when a retrain reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub text: String,
    pub label: String,
}

impl FeedbackEntry {
    /// Convert into a training sample if the label is a known category and
    /// the text is non-blank.
    pub fn to_sample(&self) -> Option<TrainingSample> {
        if self.text.trim().is_empty() {
            return None;
        }
        let label = self.label.parse::<CategorySlug>().ok()?;
        Some(TrainingSample::new(self.text.clone(), label))
    }
}

/// Probability per category, one entry per label in the active model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreDistribution(BTreeMap<CategorySlug, f64>);

impl ScoreDistribution {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, category: CategorySlug, probability: f64) {
        self.0.insert(category, probability);
    }

    pub fn get(&self, category: CategorySlug) -> Option<f64> {
        self.0.get(&category).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CategorySlug, f64)> + '_ {
        self.0.iter().map(|(c, p)| (*c, *p))
    }

    pub fn categories(&self) -> impl Iterator<Item = CategorySlug> + '_ {
        self.0.keys().copied()
    }

    /// Sum of all probabilities. 1.0 up to rounding for a model output.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Highest-probability category. Ties resolve to the earlier category.
    pub fn top(&self) -> Option<(CategorySlug, f64)> {
        self.iter().fold(None, |best, (c, p)| match best {
            Some((_, bp)) if bp >= p => best,
            _ => Some((c, p)),
        })
    }

    /// Copy with every probability rounded to `decimals` places, as the
    /// request layer reports them.
    pub fn rounded(&self, decimals: i32) -> Self {
        let factor = 10f64.powi(decimals);
        Self(
            self.0
                .iter()
                .map(|(c, p)| (*c, (p * factor).round() / factor))
                .collect(),
        )
    }
}

impl FromIterator<(CategorySlug, f64)> for ScoreDistribution {
    fn from_iter<I: IntoIterator<Item = (CategorySlug, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Outcome of classifying one description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub category: CategorySlug,
    /// Probability of `category`, in `[0, 1]`.
    pub confidence: f64,
    pub scores: ScoreDistribution,
}
