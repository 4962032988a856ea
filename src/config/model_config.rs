//! Locations of the pretrained artifacts loaded at startup.

use super::{parse_or, string_or};
use crate::application::ml::image_preprocessor::ChannelOrder;
use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    pub model_dir: PathBuf,
    pub price_model_file: String,
    pub scaler_file: String,
    pub signal_model_file: String,
    pub channel_order: ChannelOrder,
}

impl ModelEnvConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            model_dir: PathBuf::from(string_or(lookup, "MODEL_DIR", "models")),
            price_model_file: string_or(lookup, "PRICE_MODEL_FILE", "price_model.json"),
            scaler_file: string_or(lookup, "SCALER_FILE", "scaler.json"),
            signal_model_file: string_or(lookup, "SIGNAL_MODEL_FILE", "signal_model.onnx"),
            channel_order: parse_or(lookup, "IMAGE_CHANNEL_ORDER", ChannelOrder::Bgr)?,
        })
    }

    pub fn price_model_path(&self) -> PathBuf {
        self.model_dir.join(&self.price_model_file)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.model_dir.join(&self.scaler_file)
    }

    pub fn signal_model_path(&self) -> PathBuf {
        self.model_dir.join(&self.signal_model_file)
    }
}
