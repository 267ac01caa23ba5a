use cubecl::prelude::*;

use crate::{
    components::{accumulate_strip, load_tile, nchw_offset, stage_filter, unit_coords},
    definition::DepthwiseConfig,
};

/// Depthwise convolution of a contiguous NCHW tensor, specialized on one shape family.
///
/// Cube `(x, y)` handles channel group `x / bands`, output band `x % bands` of batch `y`.
/// The filter is `[channels, filter, filter]` and the output is written once per element
/// as `sum * alpha + beta`.
///
/// Shapes are not checked: `channels` must be a multiple of the channel group and every
/// buffer must match the configuration.
#[cube(launch_unchecked)]
pub fn depthwise_conv2d<F: Float>(
    input: &Array<F>,
    filter: &Array<F>,
    output: &mut Array<F>,
    channels: usize,
    alpha: f32,
    beta: f32,
    #[comptime] config: DepthwiseConfig,
    #[define(F)] _dtype: StorageType,
) {
    let bands = comptime!(config.bands);
    let group_band = CUBE_POS_X as usize;
    let batch = CUBE_POS_Y as usize;
    let band = group_band % bands;
    let channel_start = (group_band / bands) * comptime!(config.channel_group);

    let mut filter_scratch = SharedMemory::<F>::new(comptime!(config.filter_len()));
    let mut tile = SharedMemory::<F>::new(comptime!(config.tile_len()));

    let in_plane_start = nchw_offset(
        batch,
        channel_start,
        0,
        0,
        channels,
        comptime!(config.in_h),
        comptime!(config.in_w),
    );

    stage_filter::<F>(filter, &mut filter_scratch, channel_start, config);
    load_tile::<F>(input, &mut tile, in_plane_start, band, config);

    sync_cube();

    let coords = unit_coords(config);
    let out_plane_start = nchw_offset(
        batch,
        channel_start + coords.channel,
        0,
        0,
        channels,
        comptime!(config.out_h()),
        comptime!(config.out_w()),
    );

    accumulate_strip::<F>(
        &tile,
        &filter_scratch,
        output,
        &coords,
        band * comptime!(config.band_rows()),
        out_plane_start,
        F::cast_from(alpha),
        F::cast_from(beta),
        config,
    );
}
