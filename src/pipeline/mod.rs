//! Prediction Pipeline - transform then infer
//!
//! The preprocessing transform and the regression model are opaque,
//! externally fitted artifacts. The pipeline only knows their contract:
//! the transform takes the one-row table and yields a float matrix, the
//! model takes that matrix and yields a sequence whose first element is
//! the prediction.

pub mod onnx;

#[cfg(test)]
pub(crate) mod testing;


use std::sync::Arc;

use ndarray::Array2;
use serde::Serialize;

use crate::models::InputRecord;
use crate::models::RecordTable;

/// Unit label of the predicted quantity
pub const UNIT: &str = "μm";

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Any failure while loading or running the transform or the model.
///
/// Deliberately a single class: the underlying error text is all the user
/// gets to see.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct PredictionFailure(pub String);

impl PredictionFailure {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

// ============================================================================
// COLLABORATOR TRAITS
// ============================================================================

/// Pre-fitted preprocessing transform
pub trait Transformer: Send + Sync {
    fn transform(&self, table: &RecordTable) -> Result<Array2<f32>, PredictionFailure>;
}

/// Pre-trained regression model
pub trait Regressor: Send + Sync {
    fn infer(&self, encoded: &Array2<f32>) -> Result<Vec<f32>, PredictionFailure>;
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Prediction output
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub value: f64,
}

impl Prediction {
    /// Result line as shown to the user
    pub fn display(&self) -> String {
        format!("Predicted Creep Strain Value: {:.4} {}", self.value, UNIT)
    }
}

/// Loaded collaborators, read-only for the life of the process
#[derive(Clone)]
pub struct Pipeline {
    transformer: Arc<dyn Transformer>,
    model: Arc<dyn Regressor>,
}

impl Pipeline {
    pub fn new(transformer: Arc<dyn Transformer>, model: Arc<dyn Regressor>) -> Self {
        Self { transformer, model }
    }

    /// Run one record through transform and model
    pub fn predict(&self, record: &InputRecord) -> Result<Prediction, PredictionFailure> {
        self.predict_table(&record.to_table())
    }

    /// Run [`Pipeline::predict`] on the blocking pool.
    ///
    /// A panicking collaborator comes back as a plain failure.
    pub async fn predict_async(&self, record: InputRecord) -> Result<Prediction, PredictionFailure> {
        let pipeline = self.clone();

        tokio::task::spawn_blocking(move || pipeline.predict(&record))
            .await
            .map_err(|e| PredictionFailure::new(format!("Task failed: {}", e)))?
    }

    /// Same as [`Pipeline::predict`] for an already laid out table
    pub fn predict_table(&self, table: &RecordTable) -> Result<Prediction, PredictionFailure> {
        let start_time = std::time::Instant::now();

        let encoded = self.transformer.transform(table)?;
        let output = self.model.infer(&encoded)?;

        let value = output
            .first()
            .copied()
            .ok_or_else(|| PredictionFailure::new("Model returned no prediction"))?;

        if !value.is_finite() {
            return Err(PredictionFailure::new(format!(
                "Model returned a non-finite prediction ({})",
                value
            )));
        }

        tracing::debug!(
            value,
            elapsed_us = start_time.elapsed().as_micros() as u64,
            "Prediction complete"
        );

        Ok(Prediction { value: value as f64 })
    }
}

/// Load both ONNX artifacts. Either one missing or unreadable is fatal.
pub fn load_onnx(
    transformer_path: impl AsRef<std::path::Path>,
    model_path: impl AsRef<std::path::Path>,
) -> Result<Pipeline, PredictionFailure> {
    let transformer = onnx::OnnxTransformer::load(transformer_path)?;
    tracing::info!("Transform expects columns: {:?}", transformer.expected_columns());

    let model = onnx::OnnxRegressor::load(model_path)?;

    Ok(Pipeline::new(Arc::new(transformer), Arc::new(model)))
}
