//! Core training utilities

pub mod metrics;
pub mod split;

// Re-export commonly used types
pub use metrics::{accuracy, EvaluationReport, LabelHits};
pub use split::{train_test_split, Split};
