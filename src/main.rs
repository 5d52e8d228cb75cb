use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use f1predict::{PipelineConfig, PredictionService};

mod handlers;

use handlers::{health, predict};

/// Application state shared across handlers
pub struct AppState {
    pub service: PredictionService,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("{}:{}", host, port);

    let config = PipelineConfig::from_env().context("invalid configuration")?;
    info!("Loading corpus from {:?}", config.data_path);

    let service = PredictionService::bootstrap(&config)
        .with_context(|| format!("failed to train on {:?}", config.data_path))?;

    let app_state = Arc::new(AppState { service });

    info!("Starting F1 predictor API at http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .route("/health", web::get().to(health::health_check))
            .route("/predict", web::post().to(predict::predict_top10))
    })
    .bind(&addr)?
    .run()
    .await?;

    Ok(())
}
