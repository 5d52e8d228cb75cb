use serde::{Deserialize, Serialize};

use crate::predictor::RaceQuery;

/// Prediction form input
///
/// `forename`/`surname` are the driver the user is curious about; they are
/// echoed in logs but do not affect the ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub forename: String,
    #[serde(default)]
    pub surname: String,
    pub race_name: String,
    pub circuit_name: String,
    pub location: String,
    /// Race date (DD/MM/YYYY)
    pub date: String,
    /// "True" or "False"
    pub rainfall: String,
    /// Starting grid position (1-22)
    pub grid_position: i32,
}

impl PredictRequest {
    /// Feature inputs for the predictor
    pub fn to_query(&self) -> RaceQuery {
        RaceQuery {
            race_name: self.race_name.clone(),
            circuit_name: self.circuit_name.clone(),
            location: self.location.clone(),
            date: self.date.clone(),
            rainfall: self.rainfall.clone(),
            grid_position: self.grid_position,
        }
    }
}

/// One ranked driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedDriver {
    pub rank: usize,
    pub driver_id: String,
    pub forename: String,
    pub surname: String,
    pub constructor_name: String,
}

/// Prediction response
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub drivers: Vec<RankedDriver>,
    /// Ranking rendered as newline-separated lines, or a message
    pub formatted: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model_loaded: bool,
    pub corpus_size: usize,
    pub accuracy: f64,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
