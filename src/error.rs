use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

use crate::models::{ErrorResponse, PredictResponse};
use crate::predictor::PredictError;

/// Lowest selectable grid slot
pub const MIN_GRID_POSITION: i32 = 1;
/// Highest selectable grid slot
pub const MAX_GRID_POSITION: i32 = 22;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Invalid request data
    ValidationError(String),
    /// No historical driver matched; answered as an empty ranking
    NoDriverFound(String),
    /// Internal server error
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::NoDriverFound(msg) => write!(f, "{}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        let message = err.to_string();
        match err {
            PredictError::BadDateFormat => AppError::ValidationError(message),
            PredictError::NoDriverFound => AppError::NoDriverFound(message),
            PredictError::Internal(msg) => AppError::InternalError(msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NoDriverFound(_) => StatusCode::OK,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, message) = match self {
            AppError::ValidationError(msg) => ("validation_error", msg.clone()),
            AppError::NoDriverFound(msg) => {
                return HttpResponse::build(self.status_code()).json(PredictResponse {
                    drivers: Vec::new(),
                    formatted: msg.clone(),
                });
            }
            AppError::InternalError(msg) => ("internal_error", msg.clone()),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error_code.to_string(),
            message,
        })
    }
}

/// Validation functions
pub fn validate_grid_position(grid_position: i32) -> Result<(), AppError> {
    if !(MIN_GRID_POSITION..=MAX_GRID_POSITION).contains(&grid_position) {
        return Err(AppError::ValidationError(format!(
            "Grid position must be between {} and {}, got {}",
            MIN_GRID_POSITION, MAX_GRID_POSITION, grid_position
        )));
    }
    Ok(())
}

pub fn validate_rainfall(rainfall: &str) -> Result<(), AppError> {
    if !matches!(rainfall, "True" | "False") {
        return Err(AppError::ValidationError(format!(
            "Rainfall must be \"True\" or \"False\", got \"{}\"",
            rainfall
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_grid_position_valid() {
        for grid in 1..=22 {
            assert!(validate_grid_position(grid).is_ok());
        }
    }

    #[test]
    fn test_validate_grid_position_invalid() {
        assert!(validate_grid_position(0).is_err());
        assert!(validate_grid_position(23).is_err());
        assert!(validate_grid_position(-1).is_err());
    }

    #[test]
    fn test_validate_rainfall() {
        assert!(validate_rainfall("True").is_ok());
        assert!(validate_rainfall("False").is_ok());
        assert!(validate_rainfall("maybe").is_err());
        assert!(validate_rainfall("").is_err());
    }

    #[test]
    fn test_error_display() {
        let err = AppError::ValidationError("test error".to_string());
        assert!(err.to_string().contains("Validation error"));
    }

    #[test]
    fn test_from_predict_error() {
        assert_eq!(
            AppError::from(PredictError::BadDateFormat).status_code(),
            StatusCode::BAD_REQUEST
        );
        let no_driver = AppError::from(PredictError::NoDriverFound);
        assert!(matches!(no_driver, AppError::NoDriverFound(ref msg) if msg == "No driver found."));
        assert_eq!(no_driver.status_code(), StatusCode::OK);
        assert_eq!(no_driver.error_response().status(), StatusCode::OK);
        assert_eq!(
            AppError::from(PredictError::Internal("boom".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::ValidationError("".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NoDriverFound("".to_string()).status_code(),
            StatusCode::OK
        );
        assert_eq!(
            AppError::InternalError("".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
