//! Building blocks of a depthwise kernel, in execution order: staging of the filter and
//! input tile, then the rolling accumulation that hands finished sums to the writer.

mod accumulator;
mod filter_stager;
mod tile_loader;
mod writer;


pub use accumulator::*;
pub use filter_stager::*;
pub use tile_loader::*;
pub use writer::*;
