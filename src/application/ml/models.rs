use super::image_preprocessor::ImagePreprocessor;
use super::onnx_predictor::OnnxSignalPredictor;
use super::predictor::{FeatureScaler, PricePredictor, SignalPredictor};
use super::scaler::StandardScaler;
use super::smartcore_predictor::SmartCorePricePredictor;
use crate::application::feature_engineering_service::TechnicalFeatureEngineeringService;
use crate::config::ModelEnvConfig;
use crate::domain::errors::InferenceError;
use crate::domain::market::BarSeries;
use crate::domain::ml::{FEATURE_DIM, PredictionResult, SignalResult};
use anyhow::{Context, Result, bail};
use std::sync::Arc;
use tracing::info;

/// Everything fit at training time, loaded once and shared read-only by all sessions.
pub struct InferenceModels {
    features: TechnicalFeatureEngineeringService,
    scaler: Arc<dyn FeatureScaler>,
    price: Arc<dyn PricePredictor>,
    images: ImagePreprocessor,
    signal: Arc<dyn SignalPredictor>,
}

impl InferenceModels {
    pub fn new(
        scaler: Arc<dyn FeatureScaler>,
        price: Arc<dyn PricePredictor>,
        signal: Arc<dyn SignalPredictor>,
        images: ImagePreprocessor,
    ) -> Result<Self> {
        if scaler.dimension() != FEATURE_DIM {
            bail!(
                "Scaler {} expects {} features, feature engineering produces {}",
                scaler.name(),
                scaler.dimension(),
                FEATURE_DIM
            );
        }

        Ok(Self {
            features: TechnicalFeatureEngineeringService::new()?,
            scaler,
            price,
            images,
            signal,
        })
    }

    /// Loads the scaler, price model and signal model; any failure aborts startup.
    pub fn load(config: &ModelEnvConfig) -> Result<Self> {
        let scaler = StandardScaler::load(&config.scaler_path()).context("Scaler artifact")?;
        let price = SmartCorePricePredictor::load(&config.price_model_path())
            .context("Price model artifact")?;
        let signal = OnnxSignalPredictor::load(&config.signal_model_path())
            .context("Signal model artifact")?;

        let models = Self::new(
            Arc::new(scaler),
            Arc::new(price),
            Arc::new(signal),
            ImagePreprocessor::new(config.channel_order),
        )?;

        info!(
            "Models ready: price={} {}, signal={} {}, channel order {:?}",
            models.price.name(),
            models.price.version(),
            models.signal.name(),
            models.signal.version(),
            config.channel_order
        );
        Ok(models)
    }

    /// Feature engineering, scaling and regression on a fetched series.
    pub fn predict_price(&self, series: &BarSeries) -> Result<PredictionResult, InferenceError> {
        let features = self.features.compute_features(series)?;
        let scaled = self.scaler.normalize(&features)?;
        let predicted_price = self.price.predict(&scaled)?;

        if !predicted_price.is_finite() {
            return Err(InferenceError::predictor(
                self.price.name(),
                format!("non-finite prediction {}", predicted_price),
            ));
        }

        Ok(PredictionResult { predicted_price })
    }

    /// Decoding, tensor preparation and the image model on an uploaded screenshot.
    pub fn predict_signal(&self, image: &[u8]) -> Result<SignalResult, InferenceError> {
        let tensor = self.images.decode(image)?;
        let output = self.signal.predict(&tensor)?;

        // A NaN probability still reads as a sell; non-finite levels have no wire form.
        if !output.take_profit.is_finite() || !output.stop_loss.is_finite() {
            return Err(InferenceError::predictor(
                self.signal.name(),
                format!(
                    "non-finite levels tp={} sl={}",
                    output.take_profit, output.stop_loss
                ),
            ));
        }

        Ok(SignalResult::from(output))
    }

    pub fn feature_engineering(&self) -> &TechnicalFeatureEngineeringService {
        &self.features
    }
}
