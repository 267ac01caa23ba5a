#[cfg(test)]
use core::ops::Range;

use cubecl::{CubeCount, CubeDim};

use crate::definition::output_size;

/// Comptime configuration of one depthwise kernel.
///
/// A cube convolves `channel_group` channels over one band of output rows. Inside the
/// cube, each unit owns one output column of one strip of the band, for one channel.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub struct DepthwiseConfig {
    pub filter_size: usize,
    pub stride: usize,
    pub padding: usize,
    pub in_h: usize,
    pub in_w: usize,
    pub channel_group: usize,
    pub bands: usize,
    pub strips: usize,
}

impl DepthwiseConfig {
    pub fn out_h(&self) -> usize {
        output_size(self.in_h, self.filter_size, self.stride, self.padding)
    }

    pub fn out_w(&self) -> usize {
        output_size(self.in_w, self.filter_size, self.stride, self.padding)
    }

    /// Output rows computed by one cube.
    pub fn band_rows(&self) -> usize {
        self.out_h() / self.bands
    }

    /// Output rows computed by one unit.
    pub fn strip_rows(&self) -> usize {
        self.band_rows() / self.strips
    }

    pub fn padded_w(&self) -> usize {
        self.in_w + 2 * self.padding
    }

    /// Rows of one channel tile: the receptive field of a band, halo rows included.
    pub fn tile_rows(&self) -> usize {
        (self.band_rows() - 1) * self.stride + self.filter_size
    }

    /// Tile rows walked by one strip.
    pub fn strip_span(&self) -> usize {
        (self.strip_rows() - 1) * self.stride + self.filter_size
    }

    pub fn channel_tile_len(&self) -> usize {
        self.tile_rows() * self.padded_w()
    }

    pub fn tile_len(&self) -> usize {
        self.channel_group * self.channel_tile_len()
    }

    pub fn taps(&self) -> usize {
        self.filter_size * self.filter_size
    }

    pub fn filter_len(&self) -> usize {
        self.channel_group * self.taps()
    }

    pub fn lanes(&self) -> usize {
        self.channel_group * self.strips * self.out_w()
    }

    /// Number of partial sums a unit keeps alive at once.
    ///
    /// An input row belongs to at most `ceil(filter / stride)` output windows.
    pub fn slots(&self) -> usize {
        self.filter_size.div_ceil(self.stride)
    }

    /// Shared memory used by the tile and the staged filter.
    pub fn scratch_bytes(&self, elem_size: usize) -> usize {
        (self.tile_len() + self.filter_len()) * elem_size
    }

    pub fn cube_dim(&self) -> CubeDim {
        CubeDim::new_1d(self.lanes() as u32)
    }

    /// Grid of `(channel groups * bands, batch)` cubes.
    pub fn cube_count_dims(&self, batch: usize, channels: usize) -> (usize, usize) {
        ((channels / self.channel_group) * self.bands, batch)
    }

    pub fn cube_count(&self, batch: usize, channels: usize) -> CubeCount {
        let (x, y) = self.cube_count_dims(batch, channels);
        CubeCount::new_2d(x as u32, y as u32)
    }

    /// Checks that the row split tiles the output exactly.
    pub fn is_consistent(&self) -> bool {
        self.stride > 0
            && self.bands > 0
            && self.strips > 0
            && self.channel_group > 0
            && self.filter_size <= self.in_h + 2 * self.padding
            && self.out_h() % self.bands == 0
            && self.band_rows() % self.strips == 0
            && self.in_h == self.in_w
    }
}

/// One input row folded into a live accumulator.
#[cfg(test)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Contribution {
    /// Output row within the strip.
    pub output_row: usize,
    /// Filter row multiplied against the tile row.
    pub filter_row: usize,
    /// Accumulator slot holding the partial sum.
    pub slot: usize,
    /// Whether this contribution completes the output row.
    pub flush: bool,
}

/// Host model of the row walk done inline by `load_tile` and `accumulate_strip`.
/// The emulation walks its strips with `contributing_outputs`.
#[cfg(test)]
impl DepthwiseConfig {
    /// Input row mapped to the first tile row of a band. Negative inside the top halo.
    pub(crate) fn band_input_row(&self, band: usize) -> isize {
        (band * self.band_rows() * self.stride) as isize - self.padding as isize
    }

    /// Whether a tile row maps to a real input row, or to zero padding.
    pub(crate) fn tile_row_in_image(&self, band: usize, tile_row: usize) -> bool {
        let row = self.band_input_row(band) + tile_row as isize;
        row >= 0 && row < self.in_h as isize
    }

    /// Number of tile rows a band reads from outside the image, top and bottom.
    pub(crate) fn halo_rows(&self, band: usize) -> (usize, usize) {
        let first = self.band_input_row(band);
        let last = first + self.tile_rows() as isize;
        let top = (-first).max(0) as usize;
        let bottom = (last - self.in_h as isize).max(0) as usize;
        (top, bottom)
    }

    /// Strip-local output rows whose window contains the given strip tile row.
    pub(crate) fn contributing_outputs(&self, tile_row: usize) -> Range<usize> {
        let reach = tile_row + self.stride;
        let first = if reach > self.filter_size {
            (reach - self.filter_size) / self.stride
        } else {
            0
        };
        let end = (tile_row / self.stride + 1).min(self.strip_rows());

        first..end.max(first)
    }

    /// Contributions of each tile row walked by a strip, in the order a unit applies them.
    pub(crate) fn accumulation_schedule(&self) -> Vec<Vec<Contribution>> {
        let slots = self.slots();

        (0..self.strip_span())
            .map(|tile_row| {
                self.contributing_outputs(tile_row)
                    .map(|output_row| {
                        let filter_row = tile_row - output_row * self.stride;
                        Contribution {
                            output_row,
                            filter_row,
                            slot: output_row % slots,
                            flush: filter_row == self.filter_size - 1,
                        }
                    })
                    .collect()
            })
            .collect()
    }
}
