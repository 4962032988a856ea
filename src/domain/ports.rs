use crate::domain::errors::InferenceError;
use crate::domain::market::BarSeries;
use async_trait::async_trait;

/// Upstream source of historical bars, keyed by ticker.
#[async_trait]
pub trait MarketDataService: Send + Sync {
    /// Fetches bars covering at least `lookback` before now.
    ///
    /// Fails with [`InferenceError::DataUnavailable`] when the ticker is unknown or the provider
    /// cannot be reached. A short series is returned as-is; callers decide whether it is enough.
    async fn get_historical_bars(
        &self,
        ticker: &str,
        lookback: chrono::Duration,
    ) -> Result<BarSeries, InferenceError>;

    fn name(&self) -> &str;
}
