// ============================================================
// Layer 5 — Digit CNN
// ============================================================
// Fixed topology:
//
//   [N, 1, 28, 28]
//     → Conv2d 1→8, 3x3, stride 1, no padding   [N, 8, 26, 26]
//     → ReLU
//     → MaxPool 2x2, stride 2                     [N, 8, 13, 13]
//     → flatten (channel-major)                   [N, 1352]
//     → Linear 1352→10                            [N, 10]
//
// Parameters use Burn's default initialisers (Kaiming uniform
// over fan-in for both weights and biases).

use anyhow::{anyhow, Context, Result};
use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        loss::CrossEntropyLossConfig,
        pool::{MaxPool2d, MaxPool2dConfig},
        Linear, LinearConfig, Relu,
    },
    prelude::*,
};

use crate::domain::{
    sample::{IMAGE_HEIGHT, IMAGE_WIDTH, NUM_CLASSES},
    weights::{ModelWeights, KERNEL_SIZE},
};

/// Number of learned convolution filters
pub const NUM_FILTERS: usize = 8;

const POOL_SIZE: usize = 2;

#[derive(Config, Debug)]
pub struct DigitCnnConfig {
    #[config(default = "NUM_FILTERS")]
    pub num_filters: usize,
    #[config(default = "NUM_CLASSES")]
    pub num_classes: usize,
}

impl DigitCnnConfig {
    /// Width of the flattened feature vector fed to the dense layer
    /// (13 * 13 * num_filters for 28x28 input).
    pub fn dense_inputs(&self) -> usize {
        let pooled_h = (IMAGE_HEIGHT - KERNEL_SIZE + 1) / POOL_SIZE;
        let pooled_w = (IMAGE_WIDTH - KERNEL_SIZE + 1) / POOL_SIZE;
        pooled_h * pooled_w * self.num_filters
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> DigitCnn<B> {
        let conv = Conv2dConfig::new([1, self.num_filters], [KERNEL_SIZE, KERNEL_SIZE]).init(device);
        let pool = MaxPool2dConfig::new([POOL_SIZE, POOL_SIZE])
            .with_strides([POOL_SIZE, POOL_SIZE])
            .init();
        let dense = LinearConfig::new(self.dense_inputs(), self.num_classes).init(device);

        DigitCnn { conv, activation: Relu::new(), pool, dense }
    }
}

#[derive(Module, Debug)]
pub struct DigitCnn<B: Backend> {
    conv:       Conv2d<B>,
    activation: Relu,
    pool:       MaxPool2d,
    dense:      Linear<B>,
}

impl<B: Backend> DigitCnn<B> {
    /// images: [batch, 1, 28, 28] → class scores: [batch, 10]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.conv.forward(images);
        let x = self.activation.forward(x);
        let x = self.pool.forward(x);
        // [batch, C, H, W] → [batch, C*H*W], same order as a row-major view
        let x = x.flatten::<2>(1, 3);
        self.dense.forward(x)
    }

    /// Forward pass plus mean cross-entropy against integer targets.
    pub fn forward_loss(
        &self,
        images:  Tensor<B, 4>,
        targets: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let output = self.forward(images);
        let loss = CrossEntropyLossConfig::new()
            .init(&output.device())
            .forward(output.clone(), targets);
        (loss, output)
    }

    /// Copy every parameter to the host in export layout.
    ///
    /// Burn stores the dense weight as [inputs, outputs]; the export
    /// layout is [outputs, inputs], so it is transposed here.
    pub fn weights(&self) -> Result<ModelWeights> {
        let conv_kernels = to_host(self.conv.weight.val())?;
        let conv_bias = self
            .conv
            .bias
            .as_ref()
            .map(|b| to_host(b.val()))
            .transpose()?
            .context("convolution layer was built without a bias")?;

        let [inputs, outputs] = self.dense.weight.val().dims();
        let raw = to_host(self.dense.weight.val())?;
        let mut dense_weights = vec![0.0f32; raw.len()];
        for i in 0..inputs {
            for o in 0..outputs {
                dense_weights[o * inputs + i] = raw[i * outputs + o];
            }
        }

        let dense_bias = self
            .dense
            .bias
            .as_ref()
            .map(|b| to_host(b.val()))
            .transpose()?
            .context("dense layer was built without a bias")?;

        ModelWeights::new(conv_kernels, conv_bias, dense_weights, dense_bias)
    }
}

fn to_host<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Result<Vec<f32>> {
    tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| anyhow!("cannot read tensor data: {e:?}"))
}
