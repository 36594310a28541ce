//! JSON prediction API

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;

use crate::models::{collect, FieldSpec, InputRecord, PredictionForm, FIELDS};
use crate::pipeline::UNIT;
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: f64,
    pub unit: &'static str,
    pub display: String,
    pub record: InputRecord,
}

/// Assemble and predict from a JSON body
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<PredictionForm>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(form) = body.map_err(|rejection| AppError::ValidationError(rejection.body_text()))?;
    let record = collect(&form)?;
    let prediction = state.pipeline.predict_async(record.clone()).await?;

    tracing::info!("Predicted creep strain: {:.4}", prediction.value);

    Ok(Json(PredictResponse {
        prediction: prediction.value,
        unit: UNIT,
        display: prediction.display(),
        record,
    }))
}

/// Ordered input schema
pub async fn schema() -> Json<&'static [FieldSpec]> {
    Json(&FIELDS)
}
