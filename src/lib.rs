//! F1 Predictor - Top-10 finisher prediction from historical race results
//!
//! This library provides:
//! - Corpus loading and dummy encoding against a fixed training schema
//! - A seeded random-forest position classifier with held-out accuracy
//! - Ranking of historical drivers for a hypothetical race
//!
//! # Example
//!
//! ```no_run
//! use f1predict::{PipelineConfig, PredictRequest, PredictionService};
//!
//! let service = PredictionService::bootstrap(&PipelineConfig::default())?;
//! let request = PredictRequest {
//!     forename: String::new(),
//!     surname: String::new(),
//!     race_name: "Belgian Grand Prix".to_string(),
//!     circuit_name: "Circuit de Spa-Francorchamps".to_string(),
//!     location: "Spa".to_string(),
//!     date: "30/07/2023".to_string(),
//!     rainfall: "True".to_string(),
//!     grid_position: 1,
//! };
//! println!("{}", service.predict_top10(&request));
//! # Ok::<(), f1predict::predictor::StartupError>(())
//! ```

pub mod config;
pub mod core;
pub mod data;
pub mod models;
pub mod predictor;
pub mod trainer;

// API-specific modules (only available with api feature)
#[cfg(feature = "api")]
pub mod error;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use data::{FeatureRow, FeatureSchema, RaceCorpus, RaceRecord, TrainingSet};
pub use models::{PredictRequest, PredictResponse, RankedDriver};
pub use predictor::{PositionModel, PredictError, PredictionService, RaceQuery, Ranking};
pub use trainer::{ClassifierTrainer, TrainedModel, TrainerConfig};
