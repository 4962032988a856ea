use crate::domain::errors::InferenceError;
use crate::domain::market::{Bar, BarSeries};
use crate::domain::ports::MarketDataService;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CsvBar {
    timestamp: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Bars from `{dir}/{TICKER}.csv` with header `timestamp,open,high,low,close,volume`
/// (timestamps in epoch milliseconds).
pub struct CsvMarketDataService {
    dir: PathBuf,
}

impl CsvMarketDataService {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", ticker.replace('/', "_")))
    }

    fn read_bars(path: &Path, ticker: &str) -> Result<Vec<Bar>, InferenceError> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| InferenceError::data_unavailable(ticker, format!("{}", e)))?;

        reader
            .deserialize::<CsvBar>()
            .map(|row| {
                row.map(|r| Bar {
                    timestamp: r.timestamp,
                    open: r.open,
                    high: r.high,
                    low: r.low,
                    close: r.close,
                    volume: r.volume,
                })
                .map_err(|e| InferenceError::data_unavailable(ticker, format!("bad row: {}", e)))
            })
            .collect()
    }
}

#[async_trait]
impl MarketDataService for CsvMarketDataService {
    async fn get_historical_bars(
        &self,
        ticker: &str,
        lookback: chrono::Duration,
    ) -> Result<BarSeries, InferenceError> {
        let path = self.path_for(ticker);
        let owned_ticker = ticker.to_string();

        let bars = tokio::task::spawn_blocking(move || Self::read_bars(&path, &owned_ticker))
            .await
            .map_err(|e| InferenceError::data_unavailable(ticker, format!("reader task: {}", e)))??;

        let series = BarSeries::new(ticker, bars)?;
        let Some(newest) = series.last().map(|b| b.timestamp) else {
            return Err(InferenceError::data_unavailable(ticker, "file has no bars"));
        };

        let cutoff = newest - lookback.num_milliseconds();
        let window: Vec<Bar> = series
            .bars()
            .iter()
            .filter(|b| b.timestamp > cutoff)
            .copied()
            .collect();

        debug!("CsvMarketDataService: {} bars for {}", window.len(), ticker);
        BarSeries::new(ticker, window)
    }

    fn name(&self) -> &str {
        "csv"
    }
}
