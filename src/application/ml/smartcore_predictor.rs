use super::predictor::PricePredictor;
use crate::domain::errors::InferenceError;
use crate::domain::ml::{FEATURE_DIM, FeatureVector};
use anyhow::{Context, Result, anyhow, bail};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::io::BufReader;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::info;

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random forest close-price regressor, deserialized from a JSON artifact.
pub struct SmartCorePricePredictor {
    model: Forest,
    model_path: PathBuf,
}

impl SmartCorePricePredictor {
    pub fn load(model_path: &Path) -> Result<Self> {
        let file = File::open(model_path)
            .with_context(|| format!("Failed to open price model {:?}", model_path))?;

        // Smartcore deserialization (using serde_json)
        let model: Forest = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to deserialize price model {:?}", model_path))?;

        check_input_width(&model)
            .with_context(|| format!("Price model {:?} does not fit the feature set", model_path))?;

        info!("Successfully loaded price model from {:?}", model_path);
        Ok(Self::from_model(model, model_path.to_path_buf()))
    }

    pub fn from_model(model: Forest, model_path: PathBuf) -> Self {
        Self { model, model_path }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

/// Runs one all-zero row through the forest so a model fit on other columns fails at startup
/// instead of panicking inside smartcore on the first request.
fn check_input_width(model: &Forest) -> Result<()> {
    let sample = DenseMatrix::from_2d_vec(&vec![vec![0.0; FEATURE_DIM]])
        .map_err(|e| anyhow!("Matrix creation failed: {}", e))?;

    match panic::catch_unwind(AssertUnwindSafe(|| model.predict(&sample))) {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(e)) => bail!("{}-wide prediction failed: {}", FEATURE_DIM, e),
        Err(_) => bail!("forest indexes columns beyond the {} features", FEATURE_DIM),
    }
}

impl PricePredictor for SmartCorePricePredictor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        // Trees index columns directly; a short row would panic inside the forest.
        if features.len() != FEATURE_DIM {
            return Err(InferenceError::predictor(
                self.name(),
                format!("expected {} features, got {}", FEATURE_DIM, features.len()),
            ));
        }

        let input_matrix =
            DenseMatrix::from_2d_vec(&vec![features.as_slice().to_vec()]).map_err(|e| {
                InferenceError::predictor(self.name(), format!("Matrix creation failed: {}", e))
            })?;

        let predictions = self.model.predict(&input_matrix).map_err(|e| {
            InferenceError::predictor(self.name(), format!("Prediction failed: {}", e))
        })?;

        predictions
            .first()
            .copied()
            .ok_or_else(|| InferenceError::predictor(self.name(), "No prediction returned"))
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }

    fn version(&self) -> &str {
        "v1.0"
    }
}
