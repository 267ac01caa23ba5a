use cubecl::prelude::*;

use crate::definition::DepthwiseConfig;

/// Copies the taps of a channel group into shared memory, one channel after the other.
///
/// The group holds `channel_group * filter * filter` taps, which may exceed the number of
/// units in the cube, so the copy runs in as many passes as needed.
#[cube]
pub fn stage_filter<F: Float>(
    filter: &Array<F>,
    scratch: &mut SharedMemory<F>,
    channel_start: usize,
    #[comptime] config: DepthwiseConfig,
) {
    let lanes = comptime!(config.lanes());
    let len = comptime!(config.filter_len());
    let passes = comptime!(len.div_ceil(lanes));

    let source = channel_start * comptime!(config.taps());

    #[unroll]
    for pass in 0..passes {
        let pos = pass * lanes + UNIT_POS as usize;
        if pos < len {
            scratch[pos] = filter[source + pos];
        }
    }
}
