use thiserror::Error;

/// Failures surfaced by the inference pipelines.
///
/// Each variant maps to one stable wire `kind` (see [`InferenceError::kind`]) so clients can
/// branch on the failure without parsing the message.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InferenceError {
    #[error("Market data unavailable for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("Insufficient history: need {required} bars, got {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("Feature shape mismatch: expected {expected} fields, got {actual}")]
    FeatureShapeMismatch { expected: usize, actual: usize },

    #[error("Image decode failed: {reason}")]
    ImageDecode { reason: String },

    #[error("Predictor {model} failed: {reason}")]
    Predictor { model: String, reason: String },
}

impl InferenceError {
    pub fn data_unavailable(ticker: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            ticker: ticker.into(),
            reason: reason.into(),
        }
    }

    pub fn predictor(model: impl Into<String>, reason: impl ToString) -> Self {
        Self::Predictor {
            model: model.into(),
            reason: reason.to_string(),
        }
    }

    /// Wire name of the failure kind carried by `error` events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DataUnavailable { .. } => "DataUnavailable",
            Self::InsufficientHistory { .. } => "InsufficientHistory",
            Self::FeatureShapeMismatch { .. } => "FeatureShapeMismatch",
            Self::ImageDecode { .. } => "ImageDecodeError",
            Self::Predictor { .. } => "PredictorError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_are_stable() {
        assert_eq!(
            InferenceError::data_unavailable("ZZZZ999", "unknown").kind(),
            "DataUnavailable"
        );
        assert_eq!(
            InferenceError::InsufficientHistory {
                required: 200,
                available: 12
            }
            .kind(),
            "InsufficientHistory"
        );
        assert_eq!(
            InferenceError::FeatureShapeMismatch {
                expected: 6,
                actual: 5
            }
            .kind(),
            "FeatureShapeMismatch"
        );
        assert_eq!(
            InferenceError::ImageDecode {
                reason: "truncated".into()
            }
            .kind(),
            "ImageDecodeError"
        );
        assert_eq!(
            InferenceError::predictor("forest", "bad shape").kind(),
            "PredictorError"
        );
    }

    #[test]
    fn test_error_formatting() {
        let error = InferenceError::InsufficientHistory {
            required: 200,
            available: 150,
        };

        let msg = error.to_string();
        assert!(msg.contains("200"));
        assert!(msg.contains("150"));
    }
}
