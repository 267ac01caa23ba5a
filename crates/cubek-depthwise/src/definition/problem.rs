use serde::{Deserialize, Serialize};

/// Shape of a depthwise convolution over an NCHW tensor.
///
/// Each channel is convolved with its own `filter_h x filter_w` kernel, so the
/// output keeps the channel count of the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepthwiseProblem {
    pub batch: usize,
    pub channels: usize,
    pub in_h: usize,
    pub in_w: usize,
    pub filter_h: usize,
    pub filter_w: usize,
    pub stride: usize,
    pub padding: usize,
}

impl DepthwiseProblem {
    /// Square-filter problem with the `filter / 2` padding used by mobile blocks.
    pub fn same_padded(
        batch: usize,
        channels: usize,
        input: usize,
        filter: usize,
        stride: usize,
    ) -> Self {
        Self {
            batch,
            channels,
            in_h: input,
            in_w: input,
            filter_h: filter,
            filter_w: filter,
            stride,
            padding: filter / 2,
        }
    }

    pub fn out_h(&self) -> usize {
        output_size(self.in_h, self.filter_h, self.stride, self.padding)
    }

    pub fn out_w(&self) -> usize {
        output_size(self.in_w, self.filter_w, self.stride, self.padding)
    }

    pub fn input_shape(&self) -> [usize; 4] {
        [self.batch, self.channels, self.in_h, self.in_w]
    }

    pub fn filter_shape(&self) -> [usize; 4] {
        [self.channels, 1, self.filter_h, self.filter_w]
    }

    pub fn output_shape(&self) -> [usize; 4] {
        [self.batch, self.channels, self.out_h(), self.out_w()]
    }
}

/// Output size of a convolution along one spatial axis.
pub fn output_size(input: usize, filter: usize, stride: usize, padding: usize) -> usize {
    (input + 2 * padding - filter) / stride + 1
}

/// Post-scale and bias applied to every convolution sum before it is stored.
///
/// Lets the kernel absorb a folded batch-norm or a scalar residual term.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    pub alpha: f32,
    pub beta: f32,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        alpha: 1.0,
        beta: 0.0,
    };

    pub fn new(alpha: f32, beta: f32) -> Self {
        Self { alpha, beta }
    }

    pub fn apply(&self, value: f32) -> f32 {
        value * self.alpha + self.beta
    }
}
