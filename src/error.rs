//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::pipeline::PredictionFailure;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Input boundary rejections (bounds, unknown options, malformed fields)
    ValidationError(String),

    // Anything raised by the transform or the model
    PredictionFailed(PredictionFailure),
}

impl AppError {
    /// Message shown to the user
    pub fn message(&self) -> String {
        match self {
            AppError::ValidationError(msg) => msg.clone(),
            AppError::PredictionFailed(failure) => failure.to_string(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::PredictionFailed(failure) => {
                tracing::warn!("Prediction failed: {}", failure);
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };

        let body = Json(json!({
            "error": self.message(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<PredictionFailure> for AppError {
    fn from(err: PredictionFailure) -> Self {
        AppError::PredictionFailed(err)
    }
}
