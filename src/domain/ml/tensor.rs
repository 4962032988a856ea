use ndarray::{Array3, Array4, Axis};

pub const IMAGE_SIZE: usize = 128;
pub const IMAGE_CHANNELS: usize = 3;

/// Batched image input for the signal predictor, shape `(1, 128, 128, 3)`, values in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor(Array4<f32>);

impl ImageTensor {
    pub const SHAPE: [usize; 4] = [1, IMAGE_SIZE, IMAGE_SIZE, IMAGE_CHANNELS];

    /// Adds the leading batch axis to a single `(H, W, C)` image.
    ///
    /// Returns `None` when the image is not exactly `128 x 128 x 3`.
    pub fn from_hwc(image: Array3<f32>) -> Option<Self> {
        if image.shape() != [IMAGE_SIZE, IMAGE_SIZE, IMAGE_CHANNELS] {
            return None;
        }
        Some(Self(image.insert_axis(Axis(0))))
    }

    pub fn shape(&self) -> &[usize] {
        self.0.shape()
    }

    pub fn view(&self) -> &Array4<f32> {
        &self.0
    }

    /// Row-major copy of the tensor data, the layout ONNX runtimes expect.
    pub fn to_flat_vec(&self) -> Vec<f32> {
        self.0.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_axis_is_added() {
        let image = Array3::<f32>::zeros((IMAGE_SIZE, IMAGE_SIZE, IMAGE_CHANNELS));
        let tensor = ImageTensor::from_hwc(image).unwrap();
        assert_eq!(tensor.shape(), &ImageTensor::SHAPE);
        assert_eq!(tensor.to_flat_vec().len(), IMAGE_SIZE * IMAGE_SIZE * IMAGE_CHANNELS);
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        let image = Array3::<f32>::zeros((64, 64, 3));
        assert!(ImageTensor::from_hwc(image).is_none());
    }
}
