use cubecl::prelude::*;

use crate::definition::DepthwiseConfig;

/// Stages the padded input slab of a channel group and band into shared memory.
///
/// The tile is laid out `[channel][tile row][padded column]`. Tile row `t` of band `b`
/// holds input row `b * band_rows * stride + t - padding`; rows outside the image are
/// zero, as are the `padding` columns on each side.
///
/// Caller must `sync_cube()` before reading the tile.
#[cube]
pub fn load_tile<F: Float>(
    input: &Array<F>,
    tile: &mut SharedMemory<F>,
    plane_start: usize,
    band: usize,
    #[comptime] config: DepthwiseConfig,
) {
    fill_halo_columns::<F>(tile, config);
    copy_interior::<F>(input, tile, plane_start, band, config);
}

/// Zeroes the left and right halo columns of every tile row.
#[cube]
fn fill_halo_columns<F: Float>(tile: &mut SharedMemory<F>, #[comptime] config: DepthwiseConfig) {
    let padding = comptime!(config.padding);

    if comptime!(padding > 0) {
        let lanes = comptime!(config.lanes());
        let padded_w = comptime!(config.padded_w());
        let border = comptime!(2 * padding);
        let len = comptime!(config.channel_group * config.tile_rows() * border);
        let rounds = comptime!(len.div_ceil(lanes));

        for round in 0..rounds {
            let pos = round * lanes + UNIT_POS as usize;
            if pos < len {
                let row = pos / border;
                let side = pos % border;
                // Left columns keep their index, right ones skip over the image width.
                let col = side + (side / padding) * comptime!(config.in_w);
                tile[row * padded_w + col] = F::new(0.0);
            }
        }
    }
}

/// Copies the interior columns of every tile row, consecutive units on consecutive columns.
///
/// Tile rows that fall in the top or bottom halo are written as zeros. In bands that stop
/// short of the image edge this also keeps units from reading past the last input row.
#[cube]
fn copy_interior<F: Float>(
    input: &Array<F>,
    tile: &mut SharedMemory<F>,
    plane_start: usize,
    band: usize,
    #[comptime] config: DepthwiseConfig,
) {
    let lanes = comptime!(config.lanes());
    let padding = comptime!(config.padding);
    let in_w = comptime!(config.in_w);
    let tile_rows = comptime!(config.tile_rows());
    let padded_w = comptime!(config.padded_w());
    let plane = comptime!(config.in_h * config.in_w);
    let bottom = comptime!(config.in_h + config.padding);
    let len = comptime!(config.channel_group * config.tile_rows() * config.in_w);
    let rounds = comptime!(len.div_ceil(lanes));

    let band_row = band * comptime!(config.band_rows() * config.stride);

    for round in 0..rounds {
        let pos = round * lanes + UNIT_POS as usize;
        if pos < len {
            let row = pos / in_w;
            let col = pos % in_w;
            let channel = row / tile_rows;
            let padded_row = band_row + row % tile_rows;
            let dst = row * padded_w + padding + col;

            if padded_row >= padding && padded_row < bottom {
                let src = plane_start + channel * plane + (padded_row - padding) * in_w + col;
                tile[dst] = input[src];
            } else {
                tile[dst] = F::new(0.0);
            }
        }
    }
}
