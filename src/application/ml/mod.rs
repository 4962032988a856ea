pub mod image_preprocessor;
pub mod models;
pub mod onnx_predictor;
pub mod predictor;
pub mod scaler;
pub mod smartcore_predictor;

pub use models::InferenceModels;
