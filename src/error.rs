use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ML model not loaded. Service unavailable.")]
    ModelUnavailable,

    #[error("Feature shape mismatch: expected {expected} values, got {actual}")]
    FeatureShape { expected: usize, actual: usize },

    #[error("Model prediction error: {0}")]
    Prediction(String),

    #[error("Invalid model artifact: {0}")]
    ModelArtifact(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::ModelUnavailable => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::Prediction(_) | AppError::FeatureShape { .. } => {
                tracing::error!("Prediction failed: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            _ => {
                tracing::error!("Internal server error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

pub fn validation_error(msg: &str) -> AppError {
    AppError::InvalidInput(msg.to_string())
}

pub fn prediction_error(msg: impl Into<String>) -> AppError {
    AppError::Prediction(msg.into())
}
