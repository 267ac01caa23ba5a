use cubecl::prelude::*;

/// Stores one finished convolution sum with the affine epilogue.
///
/// Each output position is written by exactly one unit, once.
#[cube]
pub fn write_output<F: Float>(output: &mut Array<F>, index: usize, sum: F, alpha: F, beta: F) {
    output[index] = sum * alpha + beta;
}

/// Linear offset of `(batch, channel, row, col)` in a contiguous NCHW tensor.
#[cube]
pub fn nchw_offset(
    batch: usize,
    channel: usize,
    row: usize,
    col: usize,
    channels: usize,
    #[comptime] height: usize,
    #[comptime] width: usize,
) -> usize {
    let plane = comptime!(height * width);
    (batch * channels + channel) * plane + row * width + col
}
