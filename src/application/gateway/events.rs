use crate::domain::errors::InferenceError;
use crate::domain::ml::{PredictionResult, Signal, SignalResult};
use serde::{Deserialize, Serialize};

/// Error kind for frames that are not a recognized event envelope.
pub const BAD_REQUEST: &str = "BadRequest";

/// Client to gateway events: `{"event": "...", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum InboundEvent {
    FetchData { ticker: String },
    UploadImage { image: Vec<u8> },
}

impl InboundEvent {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn name(&self) -> &'static str {
        match self {
            InboundEvent::FetchData { .. } => "fetch_data",
            InboundEvent::UploadImage { .. } => "upload_image",
        }
    }
}

/// Gateway to client events, one per inbound event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum OutboundEvent {
    Prediction { predicted_price: f64 },
    Signal { signal: Signal, tp: f64, sl: f64 },
    Error { kind: String, message: String },
}

impl OutboundEvent {
    pub fn bad_request(message: impl Into<String>) -> Self {
        OutboundEvent::Error {
            kind: BAD_REQUEST.to_string(),
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// `"ok"` for success payloads, the error kind otherwise.
    pub fn outcome(&self) -> &str {
        match self {
            OutboundEvent::Error { kind, .. } => kind,
            _ => "ok",
        }
    }
}

impl From<PredictionResult> for OutboundEvent {
    fn from(result: PredictionResult) -> Self {
        OutboundEvent::Prediction {
            predicted_price: result.predicted_price,
        }
    }
}

impl From<SignalResult> for OutboundEvent {
    fn from(result: SignalResult) -> Self {
        OutboundEvent::Signal {
            signal: result.signal,
            tp: result.take_profit,
            sl: result.stop_loss,
        }
    }
}

impl From<&InferenceError> for OutboundEvent {
    fn from(error: &InferenceError) -> Self {
        OutboundEvent::Error {
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fetch_data() {
        let event = InboundEvent::from_json(r#"{"event":"fetch_data","data":{"ticker":"AAPL"}}"#)
            .unwrap();
        assert_eq!(
            event,
            InboundEvent::FetchData {
                ticker: "AAPL".to_string()
            }
        );
        assert_eq!(event.name(), "fetch_data");
    }

    #[test]
    fn test_parse_upload_image() {
        let event =
            InboundEvent::from_json(r#"{"event":"upload_image","data":{"image":[137,80,78,71]}}"#)
                .unwrap();
        assert_eq!(
            event,
            InboundEvent::UploadImage {
                image: vec![137, 80, 78, 71]
            }
        );
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        assert!(InboundEvent::from_json(r#"{"event":"train","data":{}}"#).is_err());
        assert!(InboundEvent::from_json(r#"{"event":"fetch_data","data":{}}"#).is_err());
        assert!(InboundEvent::from_json("not json").is_err());
    }

    #[test]
    fn test_prediction_wire_shape() {
        let json = OutboundEvent::from(PredictionResult {
            predicted_price: 187.25,
        })
        .to_json();
        assert_eq!(json, r#"{"event":"prediction","data":{"predicted_price":187.25}}"#);
    }

    #[test]
    fn test_signal_wire_shape() {
        let json = OutboundEvent::from(SignalResult {
            signal: Signal::Buy,
            take_profit: 110.5,
            stop_loss: 95.0,
        })
        .to_json();
        assert_eq!(
            json,
            r#"{"event":"signal","data":{"signal":"buy","tp":110.5,"sl":95.0}}"#
        );
    }

    #[test]
    fn test_error_wire_shape() {
        let err = InferenceError::data_unavailable("ZZZZ999", "unknown ticker");
        let event = OutboundEvent::from(&err);
        assert_eq!(event.outcome(), "DataUnavailable");

        let value: serde_json::Value = serde_json::from_str(&event.to_json()).unwrap();
        assert_eq!(value["event"], "error");
        assert_eq!(value["data"]["kind"], "DataUnavailable");
        assert!(value["data"]["message"].as_str().unwrap().contains("ZZZZ999"));
    }
}
