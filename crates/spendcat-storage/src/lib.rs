//! # spendcat-storage
//!
//! Durable state for spendcat: the persisted model file and the
//! append-only feedback ledger.

pub mod ledger;
pub mod model_store;

pub use ledger::{FeedbackLedger, FeedbackReader};
pub use model_store::{ModelStore, ModelSummary};
