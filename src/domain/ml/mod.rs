// Model input/output contracts
pub mod feature_registry;
pub mod signal;
pub mod tensor;

pub use feature_registry::{FEATURE_DIM, FEATURE_NAMES, FeatureRow, FeatureVector};
pub use signal::{PredictionResult, Signal, SignalOutput, SignalResult};
pub use tensor::ImageTensor;
