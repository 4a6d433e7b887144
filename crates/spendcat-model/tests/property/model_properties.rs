use std::sync::OnceLock;

use proptest::prelude::*;
use spendcat_core::{CategorySlug, TrainingSample};
use spendcat_model::features::char_wb_ngrams;
use spendcat_model::{Model, ModelTrainer, NgramVectorizer};

fn model() -> &'static Model {
    static MODEL: OnceLock<Model> = OnceLock::new();
    MODEL.get_or_init(|| {
        let samples = vec![
            TrainingSample::new("Java House coffee Westgate", CategorySlug::FoodDining),
            TrainingSample::new("Naivas supermarket groceries", CategorySlug::FoodDining),
            TrainingSample::new("Uber trip to CBD", CategorySlug::Transport),
            TrainingSample::new("Bolt ride home", CategorySlug::Transport),
            TrainingSample::new("KPLC prepaid tokens", CategorySlug::Utilities),
            TrainingSample::new("Safaricom home fibre", CategorySlug::Utilities),
            TrainingSample::new("Netflix subscription", CategorySlug::Entertainment),
        ];
        ModelTrainer::default().fit(&samples).unwrap().0
    })
}

// ── Score distribution is a probability distribution over the labels ────

proptest! {
    #[test]
    fn distribution_sums_to_one(text in "\\PC{0,60}") {
        let prediction = model().predict(&text);
        let total = prediction.scores.total();
        prop_assert!((total - 1.0).abs() < 1e-9, "sum was {}", total);
        for (_, p) in prediction.scores.iter() {
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn one_entry_per_label(text in "[a-zA-Z0-9 ]{0,40}") {
        let prediction = model().predict(&text);
        let categories: Vec<CategorySlug> = prediction.scores.categories().collect();
        prop_assert_eq!(categories.as_slice(), model().labels());
    }

    #[test]
    fn confidence_is_the_top_score(text in "[a-z ]{1,40}") {
        let prediction = model().predict(&text);
        let best = prediction
            .scores
            .iter()
            .map(|(_, p)| p)
            .fold(f64::NEG_INFINITY, f64::max);
        prop_assert_eq!(prediction.confidence, best);
        prop_assert_eq!(prediction.scores.get(prediction.category), Some(best));
    }

    #[test]
    fn surrounding_whitespace_is_ignored(text in "[a-z]{1,12}( [a-z]{1,12}){0,3}") {
        let padded = format!("  {text}\t ");
        prop_assert_eq!(model().predict(&padded), model().predict(&text));
    }
}

// ── Feature extraction ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn ngram_lengths_stay_in_range(text in "\\PC{0,40}") {
        for gram in char_wb_ngrams(&text, 2, 4).keys() {
            let len = gram.chars().count();
            prop_assert!((1..=4).contains(&len), "{:?} has {} chars", gram, len);
        }
    }

    #[test]
    fn vectors_are_unit_or_zero(text in "\\PC{0,40}") {
        let corpus = ["uber trip", "java house", "kplc tokens"];
        let vocab = NgramVectorizer::default().fit(&corpus).unwrap();
        let vector = vocab.transform(&text);
        let norm = vector.norm();
        prop_assert!(vector.is_zero() || (norm - 1.0).abs() < 1e-9, "norm {}", norm);
        let indices: Vec<u32> = vector.entries().iter().map(|(i, _)| *i).collect();
        prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
    }
}
