use crate::domain::errors::InferenceError;
use crate::domain::ml::{FeatureVector, ImageTensor, SignalOutput};

/// Fitted affine normalization applied before price inference.
pub trait FeatureScaler: Send + Sync {
    /// Number of fields the scaler was fit on.
    fn dimension(&self) -> usize;

    /// Normalizes `features`; a length other than [`Self::dimension`] is a shape mismatch.
    fn normalize(&self, features: &FeatureVector) -> Result<FeatureVector, InferenceError>;

    fn name(&self) -> &str;
}

/// Regression model: scaled feature vector to predicted close.
pub trait PricePredictor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError>;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version/id
    fn version(&self) -> &str;
}

/// Image model: chart screenshot tensor to buy probability plus TP/SL levels.
pub trait SignalPredictor: Send + Sync {
    fn predict(&self, tensor: &ImageTensor) -> Result<SignalOutput, InferenceError>;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version/id
    fn version(&self) -> &str;
}
