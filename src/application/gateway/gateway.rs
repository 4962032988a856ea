use super::events::{InboundEvent, OutboundEvent};
use crate::application::ml::InferenceModels;
use crate::domain::errors::InferenceError;
use crate::domain::market::normalize_ticker;
use crate::domain::ml::{PredictionResult, SignalResult};
use crate::domain::ports::MarketDataService;
use crate::infrastructure::observability::Metrics;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Routes inbound events to the price or signal pipeline.
///
/// Shared by every session. Model work runs on the blocking pool so a slow inference never
/// stalls the I/O reactor serving other sessions.
pub struct InferenceGateway {
    models: Arc<InferenceModels>,
    market_data: Arc<dyn MarketDataService>,
    lookback: chrono::Duration,
    metrics: Metrics,
}

impl InferenceGateway {
    pub fn new(
        models: Arc<InferenceModels>,
        market_data: Arc<dyn MarketDataService>,
        lookback: chrono::Duration,
        metrics: Metrics,
    ) -> Self {
        Self {
            models,
            market_data,
            lookback,
            metrics,
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Runs one event through its pipeline. Never fails: errors come back as `error` events.
    pub async fn handle(&self, event: InboundEvent) -> OutboundEvent {
        let name = event.name();
        let started = Instant::now();

        let response = match event {
            InboundEvent::FetchData { ticker } => match self.fetch_prediction(&ticker).await {
                Ok(result) => OutboundEvent::from(result),
                Err(e) => {
                    warn!("fetch_data {:?} failed: {}", ticker, e);
                    OutboundEvent::from(&e)
                }
            },
            InboundEvent::UploadImage { image } => {
                let size = image.len();
                match self.classify_image(image).await {
                    Ok(result) => OutboundEvent::from(result),
                    Err(e) => {
                        warn!("upload_image ({} bytes) failed: {}", size, e);
                        OutboundEvent::from(&e)
                    }
                }
            }
        };

        let elapsed = started.elapsed().as_secs_f64();
        self.metrics.observe_latency(name, elapsed);
        self.metrics.inc_requests(name, response.outcome());
        debug!("{} -> {} in {:.3}s", name, response.outcome(), elapsed);

        response
    }

    /// Fetches history for `raw_ticker` and runs the price pipeline on it.
    pub async fn fetch_prediction(
        &self,
        raw_ticker: &str,
    ) -> Result<PredictionResult, InferenceError> {
        let ticker = normalize_ticker(raw_ticker)
            .ok_or_else(|| InferenceError::data_unavailable(raw_ticker, "invalid ticker symbol"))?;

        let series = self
            .market_data
            .get_historical_bars(&ticker, self.lookback)
            .await?;
        debug!(
            "{}: {} bars from {}",
            ticker,
            series.len(),
            self.market_data.name()
        );

        let models = self.models.clone();
        tokio::task::spawn_blocking(move || models.predict_price(&series))
            .await
            .map_err(|e| InferenceError::predictor("price pipeline", e))?
    }

    /// Decodes an uploaded chart screenshot and runs the signal model on it.
    pub async fn classify_image(&self, image: Vec<u8>) -> Result<SignalResult, InferenceError> {
        let models = self.models.clone();
        tokio::task::spawn_blocking(move || models.predict_signal(&image))
            .await
            .map_err(|e| InferenceError::predictor("signal pipeline", e))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::image_preprocessor::ImagePreprocessor;
    use crate::application::ml::scaler::StandardScaler;
    use crate::domain::ml::{FEATURE_DIM, Signal, SignalOutput};
    use crate::infrastructure::mock::{
        LinearPricePredictor, MockMarketDataService, MockSignalPredictor, synthetic_bars,
    };

    fn png() -> Vec<u8> {
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(image::RgbImage::new(64, 64))
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn gateway(signal: MockSignalPredictor) -> InferenceGateway {
        let models = InferenceModels::new(
            Arc::new(StandardScaler::new(vec![0.0; FEATURE_DIM], vec![1.0; FEATURE_DIM]).unwrap()),
            Arc::new(LinearPricePredictor::new(vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0], 0.0)),
            Arc::new(signal),
            ImagePreprocessor::default(),
        )
        .unwrap();
        let market = MockMarketDataService::new()
            .with_bars("AAPL", synthetic_bars(250, 100.0, 42))
            .with_bars("NEW", synthetic_bars(120, 100.0, 43));

        InferenceGateway::new(
            Arc::new(models),
            Arc::new(market),
            chrono::Duration::days(400),
            Metrics::new().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_fetch_data_predicts_price() {
        let gw = gateway(MockSignalPredictor::brightness());
        let bars = synthetic_bars(250, 100.0, 42);
        let expected_ma50 = bars[200..].iter().map(|b| b.close).sum::<f64>() / 50.0;

        match gw
            .handle(InboundEvent::FetchData {
                ticker: "aapl".to_string(),
            })
            .await
        {
            OutboundEvent::Prediction { predicted_price } => {
                assert!((predicted_price - expected_ma50).abs() < 1e-9 * expected_ma50);
            }
            other => panic!("expected prediction, got {:?}", other),
        }
        assert_eq!(gw.metrics().requests("fetch_data", "ok"), 1.0);
    }

    #[tokio::test]
    async fn test_unknown_ticker_is_data_unavailable() {
        let gw = gateway(MockSignalPredictor::brightness());
        let response = gw
            .handle(InboundEvent::FetchData {
                ticker: "ZZZZ999".to_string(),
            })
            .await;
        assert_eq!(response.outcome(), "DataUnavailable");
        assert_eq!(gw.metrics().requests("fetch_data", "DataUnavailable"), 1.0);
    }

    #[tokio::test]
    async fn test_invalid_ticker_never_reaches_provider() {
        let gw = gateway(MockSignalPredictor::brightness());
        let err = gw.fetch_prediction("AA PL;drop").await.unwrap_err();
        assert_eq!(err.kind(), "DataUnavailable");
    }

    #[tokio::test]
    async fn test_short_history_is_insufficient() {
        let gw = gateway(MockSignalPredictor::brightness());
        let err = gw.fetch_prediction("NEW").await.unwrap_err();
        assert_eq!(
            err,
            InferenceError::InsufficientHistory {
                required: 200,
                available: 120
            }
        );
    }

    #[tokio::test]
    async fn test_upload_image_returns_signal() {
        let gw = gateway(MockSignalPredictor::fixed(SignalOutput {
            probability_buy: 0.6,
            take_profit: 110.0,
            stop_loss: 95.0,
        }));

        let response = gw.handle(InboundEvent::UploadImage { image: png() }).await;
        assert_eq!(
            response,
            OutboundEvent::Signal {
                signal: Signal::Buy,
                tp: 110.0,
                sl: 95.0
            }
        );
    }

    #[tokio::test]
    async fn test_non_finite_levels_are_predictor_error() {
        let gw = gateway(MockSignalPredictor::fixed(SignalOutput {
            probability_buy: 0.9,
            take_profit: f64::NAN,
            stop_loss: f64::INFINITY,
        }));

        let response = gw
            .handle(InboundEvent::UploadImage { image: png() })
            .await;
        assert_eq!(response.outcome(), "PredictorError");
        assert!(!response.to_json().contains("null"));
        assert_eq!(gw.metrics().requests("upload_image", "ok"), 0.0);
    }

    #[tokio::test]
    async fn test_nan_probability_reads_as_sell() {
        let gw = gateway(MockSignalPredictor::fixed(SignalOutput {
            probability_buy: f64::NAN,
            take_profit: 105.0,
            stop_loss: 97.0,
        }));

        let response = gw
            .handle(InboundEvent::UploadImage { image: png() })
            .await;
        assert_eq!(
            response,
            OutboundEvent::Signal {
                signal: Signal::Sell,
                tp: 105.0,
                sl: 97.0
            }
        );
    }

    #[tokio::test]
    async fn test_garbage_upload_is_decode_error() {
        let gw = gateway(MockSignalPredictor::brightness());
        let response = gw
            .handle(InboundEvent::UploadImage {
                image: b"GIF89a-but-not-really".to_vec(),
            })
            .await;
        assert_eq!(response.outcome(), "ImageDecodeError");
    }
}
