//! Character n-gram TF-IDF features.
//!
//! Text is lowercased and split on whitespace; each word is padded with one
//! space on either side and every window of `ngram_min..=ngram_max` chars is
//! counted. A padded word shorter than `n` contributes itself once and stops
//! the range early. Values are `(1 + ln tf) * idf`, L2-normalized.

use std::cmp::Reverse;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use spendcat_core::config::FeatureConfig;
use spendcat_core::errors::TrainingError;

/// Vectorizer settings, resolved from [`FeatureConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NgramVectorizer {
    pub ngram_min: usize,
    pub ngram_max: usize,
    pub max_features: usize,
}

impl Default for NgramVectorizer {
    fn default() -> Self {
        Self::from_config(&FeatureConfig::default())
    }
}

impl NgramVectorizer {
    pub fn from_config(config: &FeatureConfig) -> Self {
        Self {
            ngram_min: config.effective_ngram_min(),
            ngram_max: config.effective_ngram_max(),
            max_features: config.effective_max_features(),
        }
    }

    /// Build a vocabulary from `texts`.
    pub fn fit<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vocabulary, TrainingError> {
        self.fit_transform(texts).map(|(vocab, _)| vocab)
    }

    /// Build a vocabulary and return the feature vector of every input text.
    ///
    /// Per-document counts are kept from the document-frequency pass so the
    /// corpus is only tokenized once.
    pub fn fit_transform<S: AsRef<str>>(
        &self,
        texts: &[S],
    ) -> Result<(Vocabulary, Vec<FeatureVector>), TrainingError> {
        if self.ngram_min == 0 || self.ngram_min > self.ngram_max || self.max_features == 0 {
            return Err(TrainingError::InvalidSettings {
                message: format!(
                    "ngram range {}..={} with max_features {}",
                    self.ngram_min, self.ngram_max, self.max_features
                ),
            });
        }
        if texts.is_empty() {
            return Err(TrainingError::EmptyTrainingSet);
        }

        let counts: Vec<FxHashMap<String, u32>> = texts
            .iter()
            .map(|t| char_wb_ngrams(t.as_ref(), self.ngram_min, self.ngram_max))
            .collect();

        let mut document_frequency: FxHashMap<&str, u32> = FxHashMap::default();
        for doc in &counts {
            for gram in doc.keys() {
                *document_frequency.entry(gram.as_str()).or_insert(0) += 1;
            }
        }

        // Top-K by document frequency, ties broken lexicographically.
        let mut ranked: Vec<(&str, u32)> = document_frequency.into_iter().collect();
        let candidate_count = ranked.len();
        ranked.sort_unstable_by(|a, b| (Reverse(a.1), a.0).cmp(&(Reverse(b.1), b.0)));
        ranked.truncate(self.max_features);
        ranked.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let n_docs = texts.len() as f64;
        let terms: Vec<String> = ranked.iter().map(|(t, _)| t.to_string()).collect();
        let idf: Vec<f64> = ranked
            .iter()
            .map(|(_, df)| ((1.0 + n_docs) / (1.0 + f64::from(*df))).ln() + 1.0)
            .collect();

        let vocab = Vocabulary::new(self.ngram_min, self.ngram_max, terms, idf);
        let vectors = counts.iter().map(|c| vocab.weigh(c)).collect();

        tracing::debug!(
            documents = texts.len(),
            candidate_ngrams = candidate_count,
            feature_count = vocab.len(),
            "vocabulary fitted"
        );
        Ok((vocab, vectors))
    }
}

/// Fitted n-gram → (index, idf) mapping. Immutable once built.
///
/// Indices follow lexicographic order of the n-grams.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "VocabularyRepr", into = "VocabularyRepr")]
pub struct Vocabulary {
    ngram_min: usize,
    ngram_max: usize,
    terms: Vec<String>,
    idf: Vec<f64>,
    index: FxHashMap<String, u32>,
}

#[derive(Serialize, Deserialize)]
struct VocabularyRepr {
    ngram_min: usize,
    ngram_max: usize,
    terms: Vec<String>,
    idf: Vec<f64>,
}

impl TryFrom<VocabularyRepr> for Vocabulary {
    type Error = String;

    fn try_from(repr: VocabularyRepr) -> Result<Self, Self::Error> {
        if repr.ngram_min == 0 || repr.ngram_min > repr.ngram_max {
            return Err(format!(
                "invalid ngram range {}..={}",
                repr.ngram_min, repr.ngram_max
            ));
        }
        if repr.terms.len() != repr.idf.len() {
            return Err(format!(
                "vocabulary has {} terms but {} idf weights",
                repr.terms.len(),
                repr.idf.len()
            ));
        }
        if let Some(bad) = repr.idf.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            return Err(format!("invalid idf weight {bad}"));
        }
        let vocab = Vocabulary::new(repr.ngram_min, repr.ngram_max, repr.terms, repr.idf);
        if vocab.index.len() != vocab.terms.len() {
            return Err("vocabulary contains duplicate n-grams".to_string());
        }
        Ok(vocab)
    }
}

impl From<Vocabulary> for VocabularyRepr {
    fn from(vocab: Vocabulary) -> Self {
        Self {
            ngram_min: vocab.ngram_min,
            ngram_max: vocab.ngram_max,
            terms: vocab.terms,
            idf: vocab.idf,
        }
    }
}

impl Vocabulary {
    fn new(ngram_min: usize, ngram_max: usize, terms: Vec<String>, idf: Vec<f64>) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as u32))
            .collect();
        Self {
            ngram_min,
            ngram_max,
            terms,
            idf,
            index,
        }
    }

    /// Number of features (the width of every classifier weight row).
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn index_of(&self, ngram: &str) -> Option<usize> {
        self.index.get(ngram).map(|&i| i as usize)
    }

    pub fn idf(&self, index: usize) -> Option<f64> {
        self.idf.get(index).copied()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Map `text` into this vocabulary's feature space. Unknown n-grams are
    /// dropped; text with no known n-grams yields the zero vector.
    pub fn transform(&self, text: &str) -> FeatureVector {
        self.weigh(&char_wb_ngrams(text, self.ngram_min, self.ngram_max))
    }

    fn weigh(&self, counts: &FxHashMap<String, u32>) -> FeatureVector {
        let mut entries: Vec<(u32, f64)> = counts
            .iter()
            .filter_map(|(gram, &count)| {
                let idx = *self.index.get(gram)?;
                let tf = 1.0 + f64::from(count).ln();
                Some((idx, tf * self.idf[idx as usize]))
            })
            .collect();
        entries.sort_unstable_by_key(|(idx, _)| *idx);

        let norm = entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, v) in &mut entries {
                *v /= norm;
            }
        }
        FeatureVector { entries }
    }
}

/// Sparse, L2-normalized feature vector with entries sorted by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(u32, f64)>,
}

impl FeatureVector {
    pub fn entries(&self) -> &[(u32, f64)] {
        &self.entries
    }

    /// Largest feature index present, if any.
    pub fn max_index(&self) -> Option<u32> {
        self.entries.last().map(|&(i, _)| i)
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }

    /// Dot product with a dense row. Indices past the row's end contribute 0.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|&(i, v)| dense.get(i as usize).map(|w| w * v))
            .sum()
    }
}

/// Count word-boundary-padded character n-grams of `text`.
pub fn char_wb_ngrams(text: &str, lo: usize, hi: usize) -> FxHashMap<String, u32> {
    let mut ngrams = FxHashMap::default();
    let lower = text.to_lowercase();

    for word in lower.split_whitespace() {
        let mut padded = Vec::with_capacity(word.len() + 2);
        padded.push(' ');
        padded.extend(word.chars());
        padded.push(' ');

        for n in lo..=hi {
            if padded.len() <= n {
                let gram: String = padded.iter().collect();
                *ngrams.entry(gram).or_insert(0) += 1;
                break;
            }
            for window in padded.windows(n) {
                let gram: String = window.iter().collect();
                *ngrams.entry(gram).or_insert(0) += 1;
            }
        }
    }

    ngrams
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectorizer(max_features: usize) -> NgramVectorizer {
        NgramVectorizer {
            ngram_min: 2,
            ngram_max: 4,
            max_features,
        }
    }

    #[test]
    fn ngrams_are_padded_and_lowercased() {
        let grams = char_wb_ngrams("Uber", 2, 4);
        for expected in [" u", "ub", "be", "er", "r ", " ub", "ber ", " ube"] {
            assert!(grams.contains_key(expected), "missing {expected:?}");
        }
        assert!(!grams.keys().any(|g| g.chars().any(|c| c.is_uppercase())));
        // Padded " uber " has 5 bigrams, 4 trigrams, 3 four-grams.
        assert_eq!(grams.values().sum::<u32>(), 12);
    }

    #[test]
    fn short_word_counted_once() {
        // " a " is 3 chars: 2 bigrams, then the whole word once, no 4-grams.
        let grams = char_wb_ngrams("a", 2, 4);
        assert_eq!(grams.len(), 3);
        assert_eq!(grams.get(" a "), Some(&1));
    }

    #[test]
    fn ngrams_do_not_span_words() {
        let grams = char_wb_ngrams("kfc mall", 2, 4);
        assert!(!grams.keys().any(|g| g.contains("c m")));
    }

    #[test]
    fn multibyte_characters_not_split() {
        let grams = char_wb_ngrams("café", 2, 2);
        assert!(grams.contains_key("fé"));
        assert!(grams.contains_key("é "));
    }

    #[test]
    fn repeated_ngrams_counted() {
        let grams = char_wb_ngrams("aa aa", 2, 2);
        assert_eq!(grams.get("aa"), Some(&2));
    }

    #[test]
    fn empty_corpus_rejected() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            vectorizer(100).fit(&empty),
            Err(TrainingError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn vocabulary_indices_are_lexicographic() {
        let vocab = vectorizer(1000).fit(&["java house", "uber trip"]).unwrap();
        assert!(vocab.terms().windows(2).all(|w| w[0] < w[1]));
        for (i, term) in vocab.terms().iter().enumerate() {
            assert_eq!(vocab.index_of(term), Some(i));
        }
    }

    #[test]
    fn vocabulary_capped_by_document_frequency() {
        // "ab" appears in all three documents; it must survive a cap of 1.
        let vocab = vectorizer(1).fit(&["ab", "ab cd", "ab ef"]).unwrap();
        assert_eq!(vocab.len(), 1);
        // " ab", "ab ", " ab " all have df=3 too; lexicographic tie-break picks " a".
        assert_eq!(vocab.terms()[0], " a");
    }

    #[test]
    fn idf_is_smoothed() {
        let vocab = vectorizer(1000).fit(&["ab", "cd"]).unwrap();
        let idx = vocab.index_of("ab").unwrap();
        let expected = (3.0f64 / 2.0).ln() + 1.0;
        assert!((vocab.idf(idx).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn transform_is_unit_norm_and_sorted() {
        let vocab = vectorizer(1000)
            .fit(&["java house coffee", "uber trip"])
            .unwrap();
        let fv = vocab.transform("Java House");
        assert!((fv.norm() - 1.0).abs() < 1e-12);
        assert!(fv.entries().windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn unknown_text_is_zero_vector() {
        let vocab = vectorizer(1000).fit(&["java house"]).unwrap();
        let fv = vocab.transform("zzqx");
        assert!(fv.is_zero());
        assert_eq!(fv.norm(), 0.0);
    }

    #[test]
    fn fit_transform_matches_transform() {
        let texts = ["java house coffee westgate", "uber trip to cbd", "kplc tokens"];
        let (vocab, vectors) = vectorizer(1000).fit_transform(&texts).unwrap();
        for (text, fv) in texts.iter().zip(&vectors) {
            assert_eq!(&vocab.transform(text), fv);
        }
    }

    #[test]
    fn serde_rebuilds_index_and_rejects_mismatch() {
        let vocab = vectorizer(1000).fit(&["java house"]).unwrap();
        let json = serde_json::to_string(&vocab).unwrap();
        let back: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.index_of(" ja"), vocab.index_of(" ja"));

        let bad = r#"{"ngram_min":2,"ngram_max":4,"terms":["ab","cd"],"idf":[1.0]}"#;
        assert!(serde_json::from_str::<Vocabulary>(bad).is_err());
    }
}
