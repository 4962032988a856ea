use crate::domain::errors::InferenceError;
use crate::domain::ml::ImageTensor;
use crate::domain::ml::tensor::{IMAGE_CHANNELS, IMAGE_SIZE};
use image::imageops::{self, FilterType};
use ndarray::Array3;
use std::str::FromStr;

/// Channel layout the signal model was fit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    /// OpenCV's native decode order.
    Bgr,
}

impl FromStr for ChannelOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rgb" => Ok(ChannelOrder::Rgb),
            "bgr" => Ok(ChannelOrder::Bgr),
            _ => anyhow::bail!("Invalid IMAGE_CHANNEL_ORDER: {}. Must be 'rgb' or 'bgr'", s),
        }
    }
}

/// Decodes uploaded screenshots into the signal model's input tensor.
#[derive(Debug, Clone, Copy)]
pub struct ImagePreprocessor {
    channel_order: ChannelOrder,
}

impl ImagePreprocessor {
    pub fn new(channel_order: ChannelOrder) -> Self {
        Self { channel_order }
    }

    pub fn channel_order(&self) -> ChannelOrder {
        self.channel_order
    }

    /// Decode, resize to 128x128 (bilinear), scale to `[0, 1]`, add the batch axis.
    pub fn decode(&self, bytes: &[u8]) -> Result<ImageTensor, InferenceError> {
        if bytes.is_empty() {
            return Err(InferenceError::ImageDecode {
                reason: "empty upload".to_string(),
            });
        }

        let decoded = image::load_from_memory(bytes).map_err(|e| InferenceError::ImageDecode {
            reason: e.to_string(),
        })?;

        let rgb = decoded.to_rgb8();
        let size = IMAGE_SIZE as u32;
        let resized = imageops::resize(&rgb, size, size, FilterType::Triangle);

        let order = match self.channel_order {
            ChannelOrder::Rgb => [0, 1, 2],
            ChannelOrder::Bgr => [2, 1, 0],
        };
        let pixels = Array3::from_shape_fn((IMAGE_SIZE, IMAGE_SIZE, IMAGE_CHANNELS), |(y, x, c)| {
            let px = resized.get_pixel(x as u32, y as u32);
            px.0[order[c]] as f32 / 255.0
        });

        ImageTensor::from_hwc(pixels).ok_or_else(|| InferenceError::ImageDecode {
            reason: "unexpected tensor shape after resize".to_string(),
        })
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new(ChannelOrder::Bgr)
    }
}
