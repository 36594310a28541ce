//! Stub collaborators for tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ndarray::Array2;

use super::{Pipeline, PredictionFailure, Regressor, Transformer};
use crate::models::{AggregateType, Cell, CementType, RecordTable, COLUMNS};

/// One-hot encodes the categoricals and passes numerics through,
/// refusing anything that is not exactly the trained column list.
pub struct StubTransformer {
    pub expected: Vec<String>,
    pub calls: AtomicUsize,
}

impl StubTransformer {
    pub fn new() -> Self {
        Self {
            expected: COLUMNS.iter().map(|c| c.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn expecting(columns: &[&str]) -> Self {
        Self {
            expected: columns.iter().map(|c| c.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl Transformer for StubTransformer {
    fn transform(&self, table: &RecordTable) -> Result<Array2<f32>, PredictionFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if table.names() != self.expected {
            return Err(PredictionFailure::new(format!(
                "The feature names should match those that were passed during fit: {:?}",
                self.expected
            )));
        }

        let mut row = Vec::new();
        for column in &table.columns {
            match &column.value {
                Cell::Text(text) if column.name == COLUMNS[0] => {
                    row.extend(CementType::ALL.iter().map(|c| (c.as_str() == text.as_str()) as u8 as f32));
                }
                Cell::Text(text) => {
                    row.extend(AggregateType::ALL.iter().map(|a| (a.as_str() == text.as_str()) as u8 as f32));
                }
                Cell::Number(n) => row.push(*n as f32),
            }
        }

        let width = row.len();
        Array2::from_shape_vec((1, width), row).map_err(|e| PredictionFailure::new(e.to_string()))
    }
}

/// Weighted sum of the encoded row plus a bias
pub struct LinearRegressor;

impl Regressor for LinearRegressor {
    fn infer(&self, encoded: &Array2<f32>) -> Result<Vec<f32>, PredictionFailure> {
        let value = encoded
            .iter()
            .enumerate()
            .map(|(i, v)| v * (0.01 * (i as f32 + 1.0)))
            .sum::<f32>()
            + 12.5;
        Ok(vec![value])
    }
}

/// Returns whatever it was built with
pub struct FixedRegressor(pub Vec<f32>);

impl Regressor for FixedRegressor {
    fn infer(&self, _encoded: &Array2<f32>) -> Result<Vec<f32>, PredictionFailure> {
        Ok(self.0.clone())
    }
}

/// Always raises
pub struct FailingRegressor;

impl Regressor for FailingRegressor {
    fn infer(&self, _encoded: &Array2<f32>) -> Result<Vec<f32>, PredictionFailure> {
        Err(PredictionFailure::new("booster is not fitted"))
    }
}

/// Panics inside inference
pub struct PanickingRegressor;

impl Regressor for PanickingRegressor {
    fn infer(&self, _encoded: &Array2<f32>) -> Result<Vec<f32>, PredictionFailure> {
        panic!("booster segfaulted")
    }
}

pub fn stub_pipeline() -> Pipeline {
    Pipeline::new(Arc::new(StubTransformer::new()), Arc::new(LinearRegressor))
}
