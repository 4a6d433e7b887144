//! Tests for error codes and conversions.

use spendcat_core::errors::*;

#[test]
fn engine_error_delegates_codes_to_subsystems() {
    let corrupt: EngineError = ModelStoreError::Corrupt {
        path: "model.json".to_string(),
        reason: "checksum mismatch".to_string(),
    }
    .into();
    assert_eq!(corrupt.error_code(), error_code::MODEL_CORRUPT);

    let training: EngineError = TrainingError::InsufficientClasses { found: 1 }.into();
    assert_eq!(training.error_code(), error_code::TRAINING_ERROR);

    let category: EngineError = CategoryError::UnknownSlug {
        slug: "nope".to_string(),
    }
    .into();
    assert_eq!(category.error_code(), error_code::INVALID_CATEGORY);

    assert_eq!(EngineError::NotReady.error_code(), error_code::NOT_READY);
    assert_eq!(
        EngineError::RetrainInProgress.error_code(),
        error_code::RETRAIN_IN_PROGRESS
    );
}

#[test]
fn coded_string_prefixes_message() {
    let err = FeedbackStoreError::Write {
        path: "feedback.jsonl".to_string(),
        message: "read-only file system".to_string(),
    };
    let s = err.coded_string();
    assert!(s.starts_with("[FEEDBACK_STORE_ERROR] "));
    assert!(s.contains("read-only file system"));
}

#[test]
fn only_missing_or_corrupt_models_are_recoverable() {
    assert!(ModelStoreError::NotFound {
        path: "m".to_string()
    }
    .is_recoverable());
    assert!(ModelStoreError::Corrupt {
        path: "m".to_string(),
        reason: "r".to_string()
    }
    .is_recoverable());
    assert!(!ModelStoreError::Io {
        path: "m".to_string(),
        message: "denied".to_string()
    }
    .is_recoverable());
}
