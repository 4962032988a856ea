use crate::domain::errors::InferenceError;
use serde::{Deserialize, Serialize};

/// One OHLCV observation for a trading period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Period open time, milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Bars for one ticker, strictly increasing by timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    ticker: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Builds a series from bars in any order.
    ///
    /// Bars are sorted by timestamp; two bars sharing a timestamp violate the upstream contract
    /// and the whole series is rejected.
    pub fn new(ticker: impl Into<String>, mut bars: Vec<Bar>) -> Result<Self, InferenceError> {
        let ticker = ticker.into();
        bars.sort_by_key(|b| b.timestamp);

        if let Some(pair) = bars.windows(2).find(|w| w[0].timestamp >= w[1].timestamp) {
            return Err(InferenceError::data_unavailable(
                ticker,
                format!("duplicate bar timestamp {}", pair[1].timestamp),
            ));
        }

        Ok(Self { ticker, bars })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|b| b.close)
    }
}

/// Trims and upper-cases a client supplied ticker.
///
/// Returns `None` for empty input or characters no listed symbol uses.
pub fn normalize_ticker(raw: &str) -> Option<String> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() || ticker.len() > 16 {
        return None;
    }
    let valid = ticker
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '/'));
    valid.then_some(ticker)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: i64, close: f64) -> Bar {
        Bar {
            timestamp: ts,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn test_series_is_sorted_on_construction() {
        let series = BarSeries::new("AAPL", vec![bar(3, 3.0), bar(1, 1.0), bar(2, 2.0)]).unwrap();
        let closes: Vec<f64> = series.closes().collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
        assert_eq!(series.last().unwrap().timestamp, 3);
    }

    #[test]
    fn test_duplicate_timestamps_are_rejected() {
        let err = BarSeries::new("AAPL", vec![bar(1, 1.0), bar(2, 2.0), bar(2, 2.5)]).unwrap_err();
        assert_eq!(err.kind(), "DataUnavailable");
    }

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker("  aapl "), Some("AAPL".to_string()));
        assert_eq!(normalize_ticker("BRK.B"), Some("BRK.B".to_string()));
        assert_eq!(normalize_ticker(""), None);
        assert_eq!(normalize_ticker("AA PL"), None);
        assert_eq!(normalize_ticker("$AAPL"), None);
    }
}
