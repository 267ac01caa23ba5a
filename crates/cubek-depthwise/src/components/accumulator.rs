use cubecl::prelude::*;

use crate::{components::write_output, definition::DepthwiseConfig};

/// Position of a unit in the cube, decoded from `UNIT_POS`.
///
/// Units are ordered `[channel][strip][output column]` so that neighbouring units write
/// neighbouring output columns.
#[derive(CubeType)]
pub struct UnitCoords {
    pub channel: usize,
    pub strip: usize,
    pub col: usize,
}

#[cube]
pub fn unit_coords(#[comptime] config: DepthwiseConfig) -> UnitCoords {
    let out_w = comptime!(config.out_w());
    let unit = UNIT_POS as usize;
    let col = unit % out_w;
    let rest = unit / out_w;

    UnitCoords {
        channel: rest / comptime!(config.strips),
        strip: rest % comptime!(config.strips),
        col,
    }
}

/// Convolves one output column of one strip, walking the strip's tile rows top to bottom.
///
/// Every tile row is read once and folded into each live partial sum whose window covers
/// it. A partial sum lives in slot `output_row % slots` from its first filter row until its
/// last one, at which point it is handed to the writer and the slot is free again.
///
/// Within one output the taps are summed filter row by filter row, left to right, which
/// is the order of a plain nested-loop convolution.
#[cube]
pub fn accumulate_strip<F: Float>(
    tile: &SharedMemory<F>,
    filter: &SharedMemory<F>,
    output: &mut Array<F>,
    coords: &UnitCoords,
    out_row_start: usize,
    out_plane_start: usize,
    alpha: F,
    beta: F,
    #[comptime] config: DepthwiseConfig,
) {
    let filter_size = comptime!(config.filter_size);
    let stride = comptime!(config.stride);
    let slots = comptime!(config.slots());
    let strip_rows = comptime!(config.strip_rows());
    let padded_w = comptime!(config.padded_w());
    let out_w = comptime!(config.out_w());
    let last_filter_row = comptime!(config.filter_size - 1);

    let tile_start = coords.channel * comptime!(config.channel_tile_len())
        + coords.strip * comptime!(config.strip_rows() * config.stride * config.padded_w())
        + coords.col * stride;
    let taps_start = coords.channel * comptime!(config.taps());
    let strip_start = out_row_start + coords.strip * strip_rows;

    let mut partial = Array::<F>::new(slots);

    for tile_row in 0..comptime!(config.strip_span()) {
        let row_start = tile_start + tile_row * padded_w;

        // Outputs whose window [j * stride, j * stride + filter) contains this row.
        let mut first = 0usize;
        if tile_row + stride > filter_size {
            first = (tile_row + stride - filter_size) / stride;
        }
        let mut end = tile_row / stride + 1;
        if end > strip_rows {
            end = strip_rows;
        }

        for out_row in first..end {
            let filter_row = tile_row - out_row * stride;
            let slot = out_row % slots;
            let taps = taps_start + filter_row * filter_size;

            if filter_row == 0 {
                partial[slot] = F::new(0.0);
            }

            #[unroll]
            for col in 0..filter_size {
                partial[slot] += tile[row_start + col] * filter[taps + col];
            }

            if filter_row == last_filter_row {
                let index = out_plane_start + (strip_start + out_row) * out_w + coords.col;
                write_output::<F>(output, index, partial[slot], alpha, beta);
            }
        }
    }
}
