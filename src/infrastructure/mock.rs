use crate::application::ml::predictor::{PricePredictor, SignalPredictor};
use crate::domain::errors::InferenceError;
use crate::domain::market::{Bar, BarSeries};
use crate::domain::ml::{FeatureVector, ImageTensor, SignalOutput};
use crate::domain::ports::MarketDataService;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

const DAY_MS: i64 = 86_400_000;

/// Tickers seeded by [`MockMarketDataService::demo`].
pub const DEMO_TICKERS: &[&str] = &["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "SPY"];

/// Deterministic daily random walk starting 2024-01-02.
pub fn synthetic_bars(len: usize, start_price: f64, seed: u64) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = Utc
        .with_ymd_and_hms(2024, 1, 2, 0, 0, 0)
        .single()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_default();

    let mut close = start_price;
    (0..len)
        .map(|i| {
            let open = close;
            close = (open * (1.0 + rng.random_range(-0.02..0.02))).max(1.0);
            let high = open.max(close) * (1.0 + rng.random_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.random_range(0.0..0.01));
            Bar {
                timestamp: start + i as i64 * DAY_MS,
                open,
                high,
                low,
                close,
                volume: rng.random_range(1.0e6..5.0e6_f64).round(),
            }
        })
        .collect()
}

/// In-memory bar source keyed by ticker.
#[derive(Clone, Default)]
pub struct MockMarketDataService {
    series: HashMap<String, Vec<Bar>>,
    latency: HashMap<String, Duration>,
}

impl MockMarketDataService {
    pub fn new() -> Self {
        Self::default()
    }

    /// 500 seeded bars for each of [`DEMO_TICKERS`].
    pub fn demo() -> Self {
        DEMO_TICKERS
            .iter()
            .enumerate()
            .fold(Self::new(), |svc, (i, ticker)| {
                svc.with_bars(
                    ticker,
                    synthetic_bars(500, 50.0 + 40.0 * i as f64, 1_000 + i as u64),
                )
            })
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<Bar>) -> Self {
        self.series.insert(ticker.to_string(), bars);
        self
    }

    /// Delays every fetch for `ticker`, standing in for a slow provider.
    pub fn with_latency(mut self, ticker: &str, latency: Duration) -> Self {
        self.latency.insert(ticker.to_string(), latency);
        self
    }
}

#[async_trait]
impl MarketDataService for MockMarketDataService {
    async fn get_historical_bars(
        &self,
        ticker: &str,
        lookback: chrono::Duration,
    ) -> Result<BarSeries, InferenceError> {
        if let Some(delay) = self.latency.get(ticker) {
            tokio::time::sleep(*delay).await;
        }

        let bars = self
            .series
            .get(ticker)
            .ok_or_else(|| InferenceError::data_unavailable(ticker, "unknown ticker"))?;

        // Window relative to the newest fixture bar so fixtures never go stale.
        let newest = bars.iter().map(|b| b.timestamp).max().unwrap_or_default();
        let cutoff = newest - lookback.num_milliseconds();
        let window: Vec<Bar> = bars
            .iter()
            .filter(|b| b.timestamp > cutoff)
            .copied()
            .collect();

        debug!(
            "MockMarketDataService: {} bars for {} (of {})",
            window.len(),
            ticker,
            bars.len()
        );
        BarSeries::new(ticker, window)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Linear regression stand-in for the price model: `w . x + b`.
#[derive(Debug, Clone)]
pub struct LinearPricePredictor {
    weights: Vec<f64>,
    bias: f64,
}

impl LinearPricePredictor {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        info!("LinearPricePredictor: {} weights, bias {}", weights.len(), bias);
        Self { weights, bias }
    }
}

impl PricePredictor for LinearPricePredictor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        if features.len() != self.weights.len() {
            return Err(InferenceError::predictor(
                self.name(),
                format!(
                    "expected {} features, got {}",
                    self.weights.len(),
                    features.len()
                ),
            ));
        }
        Ok(features
            .as_slice()
            .iter()
            .zip(&self.weights)
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.bias)
    }

    fn name(&self) -> &str {
        "Linear (mock)"
    }

    fn version(&self) -> &str {
        "mock"
    }
}

/// Signal model stand-in.
///
/// With a fixed output it always answers that; otherwise the buy probability is the mean pixel
/// intensity, so bright screenshots read as buys and dark ones as sells.
#[derive(Debug, Clone, Default)]
pub struct MockSignalPredictor {
    fixed: Option<SignalOutput>,
}

impl MockSignalPredictor {
    pub fn brightness() -> Self {
        Self { fixed: None }
    }

    pub fn fixed(output: SignalOutput) -> Self {
        Self {
            fixed: Some(output),
        }
    }
}

impl SignalPredictor for MockSignalPredictor {
    fn predict(&self, tensor: &ImageTensor) -> Result<SignalOutput, InferenceError> {
        if tensor.shape() != ImageTensor::SHAPE {
            return Err(InferenceError::predictor(
                self.name(),
                format!("unexpected input shape {:?}", tensor.shape()),
            ));
        }
        if let Some(output) = self.fixed {
            return Ok(output);
        }

        let mean = tensor.view().mean().unwrap_or(0.0) as f64;
        Ok(SignalOutput {
            probability_buy: mean,
            take_profit: 100.0 * (1.0 + mean / 10.0),
            stop_loss: 100.0 * (1.0 - mean / 10.0),
        })
    }

    fn name(&self) -> &str {
        "Brightness (mock)"
    }

    fn version(&self) -> &str {
        "mock"
    }
}
