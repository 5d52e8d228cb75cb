//! Data loading and feature engineering modules

pub mod csv_loader;
pub mod dates;
pub mod features;

// Re-export commonly used types
pub use csv_loader::{DatasetError, RaceCorpus, RaceRecord};
pub use dates::{parse_corpus_date, parse_input_date, DateParts};
pub use features::{normalize_rainfall, FeatureRow, FeatureSchema, TrainingSet};
