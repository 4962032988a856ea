use crate::domain::market::Bar;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone, Serialize)]
pub struct AlpacaBar {
    #[serde(rename = "t")]
    pub timestamp: String,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v")]
    pub volume: f64,
}

impl AlpacaBar {
    /// Converts to a domain bar; `None` when the timestamp is not RFC 3339.
    pub fn to_bar(&self) -> Option<Bar> {
        let timestamp = chrono::DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()?
            .timestamp_millis();
        Some(Bar {
            timestamp,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        })
    }
}

/// One page of `GET /v2/stocks/bars`.
#[derive(Debug, Deserialize)]
pub struct AlpacaBarResponse {
    #[serde(default)]
    pub bars: Option<HashMap<String, Vec<AlpacaBar>>>,
    pub next_page_token: Option<String>,
}
