use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::data::{
    normalize_rainfall, parse_input_date, DatasetError, FeatureRow, FeatureSchema, RaceCorpus, TrainingSet,
};
use crate::models::{PredictRequest, RankedDriver};
use crate::trainer::{ClassifierTrainer, TrainError, TrainedModel, TrainerConfig};

/// Prediction failures, rendered as user-facing messages
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictError {
    #[error("Error: incorrect date format. Use DD/MM/YYYY.")]
    BadDateFormat,

    #[error("No driver found.")]
    NoDriverFound,

    #[error("Error: {0}")]
    Internal(String),
}

/// Startup failures (fatal)
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Train(#[from] TrainError),
}

/// Model seam between the predictor and the fitted classifier
pub trait PositionModel {
    /// Schema every submitted row is aligned to
    fn schema(&self) -> &FeatureSchema;

    /// Predict one position label per row
    fn predict_positions(
        &self,
        rows: &[Vec<f64>],
    ) -> Result<Vec<i32>, Box<dyn std::error::Error + Send + Sync>>;
}

impl PositionModel for TrainedModel {
    fn schema(&self) -> &FeatureSchema {
        TrainedModel::schema(self)
    }

    fn predict_positions(
        &self,
        rows: &[Vec<f64>],
    ) -> Result<Vec<i32>, Box<dyn std::error::Error + Send + Sync>> {
        self.predict(rows)
    }
}

/// Race description used as prediction input
#[derive(Debug, Clone, PartialEq)]
pub struct RaceQuery {
    pub race_name: String,
    pub circuit_name: String,
    pub location: String,
    /// DD/MM/YYYY
    pub date: String,
    pub rainfall: String,
    pub grid_position: i32,
}

/// Ordered prediction result
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ranking {
    pub drivers: Vec<RankedDriver>,
}

impl Ranking {
    /// One line per driver: `1st - Forename Surname (Constructor)`
    pub fn format(&self) -> String {
        self.drivers
            .iter()
            .map(format_entry)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// English ordinal suffix for a rank
///
/// 4 through 20 always take "th"; otherwise the last digit decides.
pub fn ordinal_suffix(rank: usize) -> &'static str {
    if (4..=20).contains(&rank) {
        return "th";
    }
    match rank % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

fn format_entry(driver: &RankedDriver) -> String {
    format!(
        "{}{} - {} {} ({})",
        driver.rank,
        ordinal_suffix(driver.rank),
        driver.forename,
        driver.surname,
        driver.constructor_name
    )
}

/// Trained model plus the corpus used to resolve predictions to drivers
///
/// Built once at startup and only read afterwards.
pub struct PredictionService<M = TrainedModel> {
    corpus: RaceCorpus,
    model: M,
    top_n: usize,
}

impl PredictionService<TrainedModel> {
    /// Load the corpus, train the forest and build the service
    pub fn bootstrap(config: &PipelineConfig) -> Result<Self, StartupError> {
        let corpus = RaceCorpus::load(&config.data_path)?;
        let set = TrainingSet::from_corpus(&corpus);
        info!(
            "Prepared {} training rows ({} dropped), schema has {} columns",
            set.len(),
            corpus.len() - set.len(),
            set.schema().len()
        );

        let model = ClassifierTrainer::new(TrainerConfig::from(config)).train(&set)?;
        Ok(Self::new(corpus, model, config.top_n))
    }
}

impl<M: PositionModel> PredictionService<M> {
    pub fn new(corpus: RaceCorpus, model: M, top_n: usize) -> Self {
        Self {
            corpus,
            model,
            top_n,
        }
    }

    pub fn corpus(&self) -> &RaceCorpus {
        &self.corpus
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Rank likely finishers for a race
    pub fn predict(&self, query: &RaceQuery) -> Result<Ranking, PredictError> {
        let date = parse_input_date(&query.date).ok_or(PredictError::BadDateFormat)?;

        let row = FeatureRow {
            race_name: query.race_name.clone(),
            circuit_name: query.circuit_name.clone(),
            location: query.location.clone(),
            date,
            rainfall: normalize_rainfall(&query.rainfall),
            grid_position: query.grid_position,
        };
        // Encoded against the training schema rather than on its own, so known
        // levels set their indicator column instead of all dummies reading 0
        let encoded = self.model.schema().encode_and_align(&row);

        let predicted = self
            .model
            .predict_positions(&[encoded])
            .map_err(|e| PredictError::Internal(e.to_string()))?;
        let labels = unique_in_order(&predicted);
        debug!("Predicted positions {:?} for {}", labels, date.year);

        let drivers = self.resolve_drivers(date.year, &labels);
        if drivers.is_empty() {
            return Err(PredictError::NoDriverFound);
        }
        Ok(Ranking { drivers })
    }

    /// Walk the year's results for each predicted position, collecting
    /// distinct drivers until `top_n` are found
    fn resolve_drivers(&self, year: i32, labels: &[i32]) -> Vec<RankedDriver> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut drivers = Vec::new();

        'labels: for &label in labels {
            for record in self.corpus.year(year).filter(|r| r.position == label) {
                if !seen.insert(record.driver_id.as_str()) {
                    continue;
                }
                drivers.push(RankedDriver {
                    rank: drivers.len() + 1,
                    driver_id: record.driver_id.clone(),
                    forename: record.forename.clone(),
                    surname: record.surname.clone(),
                    constructor_name: record.constructor_name.clone(),
                });
                if drivers.len() >= self.top_n {
                    break 'labels;
                }
            }
        }

        drivers
    }

    /// Form entry point: always returns displayable text
    pub fn predict_top10(&self, request: &PredictRequest) -> String {
        debug!(
            "Input: {} {} | {} / {} / {} | '{}' | rain={} | grid={}",
            request.forename,
            request.surname,
            request.race_name,
            request.circuit_name,
            request.location,
            request.date,
            request.rainfall,
            request.grid_position
        );

        match self.predict(&request.to_query()) {
            Ok(ranking) => ranking.format(),
            Err(e) => {
                if let PredictError::Internal(ref msg) = e {
                    warn!("Prediction failed: {}", msg);
                }
                e.to_string()
            }
        }
    }
}

fn unique_in_order(labels: &[i32]) -> Vec<i32> {
    let mut seen = HashSet::new();
    labels.iter().copied().filter(|l| seen.insert(*l)).collect()
}
