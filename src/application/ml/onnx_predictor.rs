use super::predictor::SignalPredictor;
use crate::domain::errors::InferenceError;
use crate::domain::ml::{ImageTensor, SignalOutput};
use anyhow::{Result, anyhow};
use ort::session::Session;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

/// Chart-screenshot signal model run through ONNX Runtime.
///
/// Input `f32[1, 128, 128, 3]`; output row `[probability_buy, take_profit, stop_loss]`.
pub struct OnnxSignalPredictor {
    // `Session::run` needs exclusive access; the graph itself is never mutated.
    session: Mutex<Session>,
    model_path: PathBuf,
}

impl OnnxSignalPredictor {
    pub fn load(model_path: &Path) -> Result<Self> {
        if !model_path.exists() {
            return Err(anyhow!("ONNX model file not found at {:?}", model_path));
        }

        let session = Session::builder()
            .map_err(|e| anyhow!("Failed to create ONNX session builder: {}", e))?
            .commit_from_file(model_path)
            .map_err(|e| anyhow!("Failed to load ONNX model {:?}: {}", model_path, e))?;

        info!("Successfully loaded ONNX model from {:?}", model_path);
        Ok(Self {
            session: Mutex::new(session),
            model_path: model_path.to_path_buf(),
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    fn fail(&self, reason: impl ToString) -> InferenceError {
        InferenceError::predictor(self.name(), reason)
    }
}

impl SignalPredictor for OnnxSignalPredictor {
    fn predict(&self, tensor: &ImageTensor) -> Result<SignalOutput, InferenceError> {
        let shape: Vec<usize> = tensor.shape().to_vec();
        let input_value = ort::value::Value::from_array((shape.as_slice(), tensor.to_flat_vec()))
            .map_err(|e| self.fail(format!("Input value creation failed: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| self.fail(format!("Mutex lock failed: {}", e)))?;

        let outputs = session
            .run(ort::inputs![input_value])
            .map_err(|e| self.fail(e))?;

        let output_value = outputs
            .iter()
            .next()
            .map(|(_, v)| v)
            .ok_or_else(|| self.fail("No output found"))?;
        let data = output_value
            .try_extract_tensor::<f32>()
            .map_err(|e| self.fail(e))?;

        let values: Vec<f64> = data.1.iter().take(3).map(|v| *v as f64).collect();
        match values.as_slice() {
            [probability_buy, take_profit, stop_loss] => Ok(SignalOutput {
                probability_buy: *probability_buy,
                take_profit: *take_profit,
                stop_loss: *stop_loss,
            }),
            _ => Err(self.fail(format!(
                "expected 3 output values, got {}",
                values.len()
            ))),
        }
    }

    fn name(&self) -> &str {
        "ONNX Runtime (chart CNN)"
    }

    fn version(&self) -> &str {
        "v1.0"
    }
}
