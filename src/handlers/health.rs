use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::AppState;
use f1predict::models::HealthResponse;

/// Health check endpoint
pub async fn health_check(state: web::Data<Arc<AppState>>) -> impl Responder {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_loaded: true,
        corpus_size: state.service.corpus().len(),
        accuracy: state.service.model().report().accuracy,
    };

    HttpResponse::Ok().json(response)
}
