// ============================================================
// Layer 4 — Digit Batcher
// ============================================================
// Implements Burn's Batcher trait to stack a Vec<DigitSample>
// into the two tensors the training step needs.
//
//   Input:  N samples, each 784 u8 intensities + a label
//   Output: images  [N, 1, 28, 28] floats in [0, 1]
//           targets [N]            class indices
//
// Intensities are only rescaled (value / 255); there is no
// mean/std normalisation.
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::domain::sample::{DigitSample, IMAGE_HEIGHT, IMAGE_PIXELS, IMAGE_WIDTH};

// ─── DigitBatch ───────────────────────────────────────────────────────────────
/// A mini-batch ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct DigitBatch<B: Backend> {
    /// shape: [batch_size, 1, 28, 28]
    pub images: Tensor<B, 4>,

    /// shape: [batch_size], one class index per image
    pub targets: Tensor<B, 1, Int>,
}

// ─── DigitBatcher ─────────────────────────────────────────────────────────────
#[derive(Clone, Debug, Default)]
pub struct DigitBatcher;

impl DigitBatcher {
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Batcher<B, DigitSample, DigitBatch<B>> for DigitBatcher {
    fn batch(&self, items: Vec<DigitSample>, device: &B::Device) -> DigitBatch<B> {
        let batch_size = items.len();

        // Flatten every image into one [N * 784] buffer, scaled to [0, 1]
        let pixels: Vec<f32> = items
            .iter()
            .flat_map(|s| s.pixels().iter().map(|&p| p as f32 / 255.0))
            .collect();
        debug_assert_eq!(pixels.len(), batch_size * IMAGE_PIXELS);

        let labels: Vec<i64> = items.iter().map(|s| s.label() as i64).collect();

        let images = Tensor::<B, 4>::from_data(
            TensorData::new(pixels, [batch_size, 1, IMAGE_HEIGHT, IMAGE_WIDTH])
                .convert::<B::FloatElem>(),
            device,
        );

        let targets = Tensor::<B, 1, Int>::from_data(
            TensorData::new(labels, [batch_size]).convert::<B::IntElem>(),
            device,
        );

        DigitBatch { images, targets }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_batch_shapes_and_scaling() {
        let device = Default::default();
        let mut pixels = vec![0u8; IMAGE_PIXELS];
        pixels[0] = 255;
        pixels[IMAGE_PIXELS - 1] = 51;

        let items = vec![
            DigitSample::new(pixels, 3).unwrap(),
            DigitSample::blank(9),
        ];
        let batch: DigitBatch<TestBackend> = DigitBatcher::new().batch(items, &device);

        assert_eq!(batch.images.dims(), [2, 1, 28, 28]);
        assert_eq!(batch.targets.dims(), [2]);

        let values = batch.images.into_data().to_vec::<f32>().unwrap();
        assert_eq!(values[0], 1.0);
        assert!((values[IMAGE_PIXELS - 1] - 0.2).abs() < 1e-6);
        assert!(values[IMAGE_PIXELS..].iter().all(|&v| v == 0.0));

        let targets = batch.targets.into_data().convert::<i64>().to_vec::<i64>().unwrap();
        assert_eq!(targets, vec![3, 9]);
    }
}
