use super::predictor::FeatureScaler;
use crate::domain::errors::InferenceError;
use crate::domain::ml::feature_registry::{FEATURE_NAMES, matches_registry};
use crate::domain::ml::FeatureVector;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// On-disk scaler artifact, exported alongside the price model.
#[derive(Debug, Deserialize)]
struct ScalerArtifact {
    feature_names: Vec<String>,
    mean: Vec<f64>,
    scale: Vec<f64>,
}

/// Standardization `(x - mean) / scale` with per-field parameters fixed at fit time.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        if mean.len() != scale.len() {
            bail!(
                "Scaler mean has {} fields but scale has {}",
                mean.len(),
                scale.len()
            );
        }
        if let Some(bad) = mean.iter().chain(&scale).find(|v| !v.is_finite()) {
            bail!("Scaler parameters must be finite, found {}", bad);
        }

        // A constant column was fit with zero variance; leave it centered but unscaled.
        let scale = scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect();

        Ok(Self { mean, scale })
    }

    /// Loads a scaler artifact and checks its column order against the feature registry.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open scaler artifact {:?}", path))?;
        let artifact: ScalerArtifact = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse scaler artifact {:?}", path))?;

        if !matches_registry(&artifact.feature_names) {
            bail!(
                "Scaler {:?} was fit on columns {:?}, serving expects {:?}",
                path,
                artifact.feature_names,
                FEATURE_NAMES
            );
        }
        if artifact.mean.len() != FEATURE_NAMES.len() {
            bail!(
                "Scaler {:?} has {} parameters, serving expects {}",
                path,
                artifact.mean.len(),
                FEATURE_NAMES.len()
            );
        }

        let scaler = Self::new(artifact.mean, artifact.scale)?;
        info!("Successfully loaded scaler from {:?}", path);
        Ok(scaler)
    }
}

impl FeatureScaler for StandardScaler {
    fn dimension(&self) -> usize {
        self.mean.len()
    }

    fn normalize(&self, features: &FeatureVector) -> Result<FeatureVector, InferenceError> {
        if features.len() != self.dimension() {
            return Err(InferenceError::FeatureShapeMismatch {
                expected: self.dimension(),
                actual: features.len(),
            });
        }

        let scaled = features
            .as_slice()
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect();

        Ok(FeatureVector::new(scaled))
    }

    fn name(&self) -> &str {
        "StandardScaler"
    }
}
