use crate::definition::DepthwiseProblem;

/// Contiguous NCHW addressing on the host.
///
/// Sizes the buffers handed to the kernel and addresses the host emulation. Inside the
/// kernel the same offsets come from `nchw_offset` plus row and column steps.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TensorLayout {
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl TensorLayout {
    pub fn new(channels: usize, height: usize, width: usize) -> Self {
        Self {
            channels,
            height,
            width,
        }
    }

    pub fn input(problem: &DepthwiseProblem) -> Self {
        Self::new(problem.channels, problem.in_h, problem.in_w)
    }

    pub fn output(problem: &DepthwiseProblem) -> Self {
        Self::new(problem.channels, problem.out_h(), problem.out_w())
    }

    pub fn plane_stride(&self) -> usize {
        self.height * self.width
    }

    pub fn batch_stride(&self) -> usize {
        self.channels * self.plane_stride()
    }

    /// Offset of the first element of a channel plane.
    pub fn plane_offset(&self, batch: usize, channel: usize) -> usize {
        batch * self.batch_stride() + channel * self.plane_stride()
    }

    pub fn offset(&self, batch: usize, channel: usize, row: usize, col: usize) -> usize {
        self.plane_offset(batch, channel) + row * self.width + col
    }

    /// Row-major strides `[batch, channel, row, col]`.
    pub fn strides(&self) -> [usize; 4] {
        [self.batch_stride(), self.plane_stride(), self.width, 1]
    }

    pub fn len(&self, batch: usize) -> usize {
        batch * self.batch_stride()
    }
}
