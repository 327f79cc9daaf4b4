// ============================================================
// Layer 4 — Image Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<ImageSample>
// into tensors on the training device.
//
// How batching works here:
//   Input:  N ImageSamples, each a flat [H * W * 3] pixel vector
//   Output: ImageBatch with images [N, H, W, 3] and targets [N]
//
//   All pixel vectors are concatenated in order and reshaped:
//   [s1_p1, ..., s1_pK, s2_p1, ..., sN_pK] → [N, H, W, 3]
//
// Every sample has the same size because the preprocessor
// resizes to a fixed side length.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::ImageSample;
use crate::data::preprocessor::PixelTensor;

/// A batch of images ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct ImageBatch<B: Backend> {
    /// shape: [batch_size, height, width, 3], values in [0, 1]
    pub images: Tensor<B, 4>,

    /// shape: [batch_size], one class label per image
    pub targets: Tensor<B, 1, Int>,
}

#[derive(Clone, Debug)]
pub struct ImageBatcher<B: Backend> {
    /// The device to create tensors on
    pub device:     B::Device,
    pub image_size: usize,
}

impl<B: Backend> ImageBatcher<B> {
    pub fn new(device: B::Device, image_size: usize) -> Self {
        Self { device, image_size }
    }
}

impl<B: Backend> Batcher<B, ImageSample, ImageBatch<B>> for ImageBatcher<B> {
    fn batch(&self, items: Vec<ImageSample>, _device: &B::Device) -> ImageBatch<B> {
        let batch_size = items.len();
        let side       = self.image_size;

        let mut pixels  = Vec::with_capacity(batch_size * side * side * 3);
        let mut targets = Vec::with_capacity(batch_size);
        for item in items {
            pixels.extend_from_slice(&item.pixels);
            targets.push(item.label as i64);
        }

        let images = Tensor::<B, 4>::from_data(
            TensorData::new(pixels, [batch_size, side, side, 3]),
            &self.device,
        );
        let targets = Tensor::<B, 1, Int>::from_ints(targets.as_slice(), &self.device);

        ImageBatch { images, targets }
    }
}

/// Lift one preprocessed image into a [1, H, W, 3] tensor
pub fn pixel_tensor_to_burn<B: Backend>(tensor: PixelTensor, device: &B::Device) -> Tensor<B, 4> {
    let shape = tensor.shape;
    Tensor::<B, 4>::from_data(TensorData::new(tensor.into_data(), shape), device)
}
