//! Shared constants for the spendcat classifier.

/// Shortest character n-gram extracted from padded words.
pub const DEFAULT_NGRAM_MIN: usize = 2;

/// Longest character n-gram extracted from padded words.
pub const DEFAULT_NGRAM_MAX: usize = 4;

/// Vocabulary cap (top-K n-grams by document frequency).
pub const DEFAULT_MAX_FEATURES: usize = 30_000;

/// Inverse L2 regularization strength (larger = weaker penalty).
pub const DEFAULT_REGULARIZATION: f64 = 5.0;

/// Optimizer iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 1_000;

/// Convergence threshold on the max-abs gradient component.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Number of (s, y) correction pairs kept by L-BFGS.
pub const DEFAULT_HISTORY_SIZE: usize = 10;

/// Default persisted model location.
pub const DEFAULT_MODEL_PATH: &str = "model.json";

/// Default feedback ledger location.
pub const DEFAULT_FEEDBACK_PATH: &str = "feedback.jsonl";

/// Longest accepted feedback description, in characters.
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 500;

/// Project config file name looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "spendcat.toml";
