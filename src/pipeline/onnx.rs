//! ONNX Runtime collaborators
//!
//! Both artifacts are loaded once at startup. `ort` needs `&mut Session` to
//! run, so each session sits behind a mutex; nothing else about them changes
//! after load.

use std::path::Path;

use ndarray::Array2;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::tensor::TensorElementType;
use ort::value::{DynValue, Tensor, ValueType};
use parking_lot::Mutex;

use super::{PredictionFailure, Regressor, Transformer};
use crate::models::{Cell, RecordTable};

// ============================================================================
// LOADING
// ============================================================================

fn load_session(path: &Path) -> Result<Session, PredictionFailure> {
    tracing::info!("Loading ONNX artifact from: {}", path.display());

    if !path.exists() {
        return Err(PredictionFailure::new(format!(
            "Artifact not found: {}",
            path.display()
        )));
    }

    let session = Session::builder()
        .map_err(|e| PredictionFailure::new(format!("Failed to create session builder: {}", e)))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| PredictionFailure::new(format!("Failed to set optimization: {}", e)))?
        .commit_from_file(path)
        .map_err(|e| PredictionFailure::new(format!("Failed to load {}: {}", path.display(), e)))?;

    tracing::info!(
        inputs = session.inputs.len(),
        outputs = session.outputs.len(),
        "ONNX artifact loaded: {}",
        path.display()
    );

    Ok(session)
}

fn first_output_name(session: &Session) -> Result<String, PredictionFailure> {
    session
        .outputs
        .first()
        .map(|o| o.name.clone())
        .ok_or_else(|| PredictionFailure::new("No output defined"))
}

/// Pull a float tensor out of a session output, widening or narrowing as needed
fn extract_floats(value: &DynValue) -> Result<Vec<f32>, PredictionFailure> {
    if let Ok((_, data)) = value.try_extract_tensor::<f32>() {
        return Ok(data.to_vec());
    }

    let (_, data) = value
        .try_extract_tensor::<f64>()
        .map_err(|e| PredictionFailure::new(format!("Extract error: {}", e)))?;

    Ok(data.iter().map(|v| *v as f32).collect())
}

// ============================================================================
// SCHEMA
// ============================================================================

/// Text cells feed string inputs, numbers feed float inputs
fn cell_fits(ty: TensorElementType, cell: &Cell) -> bool {
    matches!(
        (ty, cell),
        (TensorElementType::String, Cell::Text(_))
            | (TensorElementType::Float32, Cell::Number(_))
            | (TensorElementType::Float64, Cell::Number(_))
    )
}

/// Compare the table against the graph's inputs: same names, same order,
/// compatible element types.
pub fn check_schema(
    columns: &[(String, TensorElementType)],
    table: &RecordTable,
) -> Result<(), PredictionFailure> {
    let expected: Vec<&str> = columns.iter().map(|(name, _)| name.as_str()).collect();
    let received = table.names();

    if expected != received {
        return Err(PredictionFailure::new(format!(
            "Column mismatch: transform expects {:?}, got {:?}",
            expected, received
        )));
    }

    for ((name, ty), column) in columns.iter().zip(&table.columns) {
        if !cell_fits(*ty, &column.value) {
            return Err(PredictionFailure::new(format!(
                "Column '{}' holds {:?} but the transform expects {:?}",
                name, column.value, ty
            )));
        }
    }
    Ok(())
}

// ============================================================================
// PREPROCESSING TRANSFORM
// ============================================================================

/// Preprocessing transform exported as an ONNX graph with one input per column
pub struct OnnxTransformer {
    session: Mutex<Session>,
    columns: Vec<(String, TensorElementType)>,
    output_name: String,
}

impl OnnxTransformer {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PredictionFailure> {
        let session = load_session(path.as_ref())?;

        let columns = session
            .inputs
            .iter()
            .map(|input| {
                let ty = match &input.input_type {
                    ValueType::Tensor { ty, .. } => *ty,
                    other => {
                        return Err(PredictionFailure::new(format!(
                            "Transform input '{}' is not a tensor ({:?})",
                            input.name, other
                        )))
                    }
                };
                Ok((input.name.clone(), ty))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let output_name = first_output_name(&session)?;

        Ok(Self {
            session: Mutex::new(session),
            columns,
            output_name,
        })
    }

    /// Column labels the transform was fitted against
    pub fn expected_columns(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn cell_tensor(name: &str, ty: TensorElementType, cell: &Cell) -> Result<DynValue, PredictionFailure> {
        let tensor_err = |e: ort::Error| PredictionFailure::new(format!("Tensor error for '{}': {}", name, e));

        match (ty, cell) {
            (TensorElementType::String, Cell::Text(text)) => {
                let array = Array2::from_elem((1, 1), text.clone());
                Ok(Tensor::from_string_array(&array).map_err(tensor_err)?.into_dyn())
            }
            (TensorElementType::Float32, Cell::Number(n)) => {
                let array = Array2::from_elem((1, 1), *n as f32);
                Ok(Tensor::from_array(array).map_err(tensor_err)?.into_dyn())
            }
            (TensorElementType::Float64, Cell::Number(n)) => {
                let array = Array2::from_elem((1, 1), *n);
                Ok(Tensor::from_array(array).map_err(tensor_err)?.into_dyn())
            }
            (ty, cell) => Err(PredictionFailure::new(format!(
                "Column '{}' holds {:?} but the transform expects {:?}",
                name, cell, ty
            ))),
        }
    }
}

impl Transformer for OnnxTransformer {
    fn transform(&self, table: &RecordTable) -> Result<Array2<f32>, PredictionFailure> {
        check_schema(&self.columns, table)?;

        let inputs = self
            .columns
            .iter()
            .zip(&table.columns)
            .map(|((name, ty), column)| Ok((name.clone(), Self::cell_tensor(name, *ty, &column.value)?)))
            .collect::<Result<Vec<(String, DynValue)>, PredictionFailure>>()?;

        let mut session = self.session.lock();
        let outputs = session
            .run(inputs)
            .map_err(|e| PredictionFailure::new(format!("Transform failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| PredictionFailure::new("Transform produced no output"))?;

        let data = extract_floats(output)?;
        let width = data.len();

        Array2::from_shape_vec((1, width), data)
            .map_err(|e| PredictionFailure::new(format!("Array error: {}", e)))
    }
}

// ============================================================================
// REGRESSION MODEL
// ============================================================================

/// Regression model exported as an ONNX graph with a single float input
pub struct OnnxRegressor {
    session: Mutex<Session>,
    output_name: String,
}

impl OnnxRegressor {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PredictionFailure> {
        let session = load_session(path.as_ref())?;
        let output_name = first_output_name(&session)?;

        Ok(Self {
            session: Mutex::new(session),
            output_name,
        })
    }
}

impl Regressor for OnnxRegressor {
    fn infer(&self, encoded: &Array2<f32>) -> Result<Vec<f32>, PredictionFailure> {
        let input_tensor = Tensor::from_array(encoded.clone())
            .map_err(|e| PredictionFailure::new(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| PredictionFailure::new(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| PredictionFailure::new("No output"))?;

        extract_floats(output)
    }
}
