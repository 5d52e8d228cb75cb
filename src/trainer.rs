//! Classifier training
//!
//! Fits a random forest on the encoded corpus, predicting the finishing
//! position (sentinel 0 included) as a class label, and evaluates it on a
//! seeded held-out split.

use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::error::Failed;
use smartcore::linalg::basic::matrix::DenseMatrix;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::core::{train_test_split, EvaluationReport};
use crate::data::{FeatureSchema, TrainingSet};

type Forest = RandomForestClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// Training errors
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("training set is empty")]
    EmptyDataset,

    #[error("split left the {partition} partition empty ({rows} rows total)")]
    EmptyPartition { partition: &'static str, rows: usize },

    #[error("random forest failed: {0}")]
    Forest(#[from] Failed),
}

/// Trainer settings
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    pub n_trees: u16,
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for TrainerConfig {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            n_trees: config.n_trees,
            test_fraction: config.test_fraction,
            seed: config.seed,
        }
    }
}

/// Fitted forest with the schema it was trained on
pub struct TrainedModel {
    forest: Forest,
    schema: FeatureSchema,
    report: EvaluationReport,
}

impl TrainedModel {
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Held-out evaluation from training time
    pub fn report(&self) -> &EvaluationReport {
        &self.report
    }

    /// Predict position labels for rows already aligned to the schema
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i32>, Box<dyn std::error::Error + Send + Sync>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(row) = rows.iter().find(|r| r.len() != self.schema.len()) {
            return Err(format!(
                "feature row has {} columns, model expects {}",
                row.len(),
                self.schema.len()
            )
            .into());
        }

        let matrix = DenseMatrix::from_2d_vec(&rows.to_vec());
        Ok(self.forest.predict(&matrix)?)
    }
}

/// Random forest trainer
pub struct ClassifierTrainer {
    config: TrainerConfig,
}

impl ClassifierTrainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(TrainerConfig::default())
    }

    /// Split, fit and evaluate
    pub fn train(&self, set: &TrainingSet) -> Result<TrainedModel, TrainError> {
        if set.is_empty() {
            return Err(TrainError::EmptyDataset);
        }

        let split = train_test_split(set.len(), self.config.test_fraction, self.config.seed);
        for (partition, indices) in [("train", &split.train), ("test", &split.test)] {
            if indices.is_empty() {
                return Err(TrainError::EmptyPartition {
                    partition,
                    rows: set.len(),
                });
            }
        }

        let (x_train, y_train) = set.subset(&split.train);
        let (x_test, y_test) = set.subset(&split.test);

        info!(
            "Training random forest: {} trees, {} features, {} train / {} test rows",
            self.config.n_trees,
            set.schema().len(),
            x_train.len(),
            x_test.len()
        );

        let parameters = RandomForestClassifierParameters::default()
            .with_n_trees(self.config.n_trees)
            .with_seed(self.config.seed);
        let forest = Forest::fit(&DenseMatrix::from_2d_vec(&x_train), &y_train, parameters)?;

        let y_pred = forest.predict(&DenseMatrix::from_2d_vec(&x_test))?;
        let report = EvaluationReport::from_predictions(&y_test, &y_pred, x_train.len(), set.class_count())
            .ok_or(TrainError::EmptyPartition {
                partition: "test",
                rows: set.len(),
            })?;

        info!("Accuracy: {:.4} ({}/{})", report.accuracy, report.correct, report.test_size);
        debug!("Per-position hits: {:?}", report.per_label);

        Ok(TrainedModel {
            forest,
            schema: set.schema().clone(),
            report,
        })
    }
}
