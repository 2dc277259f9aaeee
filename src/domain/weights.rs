// ============================================================
// Layer 3 — ModelWeights Domain Type
// ============================================================
// A frozen, host-side copy of every trained parameter, already
// laid out the way the exported text files expect it:
//
//   conv_kernels  [num_filters, 3, 3]   filter-major, row-major
//   conv_bias     [num_filters]
//   dense_weights [num_classes, dense_inputs]  row-major
//   dense_bias    [num_classes]
//
// Export only ever reads this struct, so writing it twice
// produces identical output.

use anyhow::{ensure, Result};

/// Side length of each square convolution kernel
pub const KERNEL_SIZE: usize = 3;

/// Values per flattened kernel
pub const KERNEL_VALUES: usize = KERNEL_SIZE * KERNEL_SIZE;

#[derive(Debug, Clone, PartialEq)]
pub struct ModelWeights {
    conv_kernels: Vec<f32>,
    conv_bias: Vec<f32>,
    dense_weights: Vec<f32>,
    dense_bias: Vec<f32>,
    dense_inputs: usize,
}

impl ModelWeights {
    /// Assemble a snapshot, checking that all four buffers agree
    /// on the filter count, class count and dense input width.
    pub fn new(
        conv_kernels: Vec<f32>,
        conv_bias: Vec<f32>,
        dense_weights: Vec<f32>,
        dense_bias: Vec<f32>,
    ) -> Result<Self> {
        let num_filters = conv_bias.len();
        let num_classes = dense_bias.len();

        ensure!(num_filters > 0, "model has no convolution filters");
        ensure!(num_classes > 0, "model has no output classes");
        ensure!(
            conv_kernels.len() == num_filters * KERNEL_VALUES,
            "conv kernels hold {} values, expected {} ({} filters of {}x{})",
            conv_kernels.len(),
            num_filters * KERNEL_VALUES,
            num_filters,
            KERNEL_SIZE,
            KERNEL_SIZE
        );
        ensure!(
            dense_weights.len() % num_classes == 0,
            "dense weights ({}) are not a multiple of the class count ({})",
            dense_weights.len(),
            num_classes
        );

        let dense_inputs = dense_weights.len() / num_classes;
        Ok(Self { conv_kernels, conv_bias, dense_weights, dense_bias, dense_inputs })
    }

    pub fn num_filters(&self) -> usize {
        self.conv_bias.len()
    }

    pub fn num_classes(&self) -> usize {
        self.dense_bias.len()
    }

    pub fn dense_inputs(&self) -> usize {
        self.dense_inputs
    }

    /// The 3x3 weights of filter `index`, row-major.
    ///
    /// # Panics
    /// Panics if `index >= num_filters()`.
    pub fn kernel(&self, index: usize) -> &[f32] {
        let start = index * KERNEL_VALUES;
        &self.conv_kernels[start..start + KERNEL_VALUES]
    }

    pub fn conv_bias(&self) -> &[f32] {
        &self.conv_bias
    }

    /// Dense weights as `[num_classes, dense_inputs]`, row-major
    pub fn dense_weights(&self) -> &[f32] {
        &self.dense_weights
    }

    pub fn dense_bias(&self) -> &[f32] {
        &self.dense_bias
    }
}
