use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::AppState;
use f1predict::error::{validate_grid_position, validate_rainfall, AppError};
use f1predict::models::{PredictRequest, PredictResponse};
use f1predict::PredictError;

/// Predict the top finishers for a race
pub async fn predict_top10(
    state: web::Data<Arc<AppState>>,
    req: web::Json<PredictRequest>,
) -> Result<HttpResponse, AppError> {
    validate_grid_position(req.grid_position)?;
    validate_rainfall(&req.rainfall)?;

    debug!(
        "Predict request for {} {}: {} on {}",
        req.forename, req.surname, req.race_name, req.date
    );

    let ranking = state.service.predict(&req.to_query()).map_err(|e| {
        if e != PredictError::NoDriverFound {
            warn!("Prediction failed: {}", e);
        }
        AppError::from(e)
    })?;

    let response = PredictResponse {
        formatted: ranking.format(),
        drivers: ranking.drivers,
    };

    Ok(HttpResponse::Ok().json(response))
}
