//! Fixed-shape depthwise convolution kernels for MobileNet-V2 and EfficientNet-B0 blocks.
//!
//! Every kernel follows the same plan, specialized at compile time per shape family:
//! stage the channel group's filter taps and a zero-padded input tile in shared memory,
//! synchronize once, then let each unit walk its strip of tile rows with a small set of
//! rolling accumulators, writing `sum * alpha + beta` as each output row completes.
//!
//! Use [launch] or [launch_ref] to run a problem; the [Strategy] picks the variant.

pub mod components;
pub mod definition;
pub mod kernels;
pub mod launch;

pub use definition::{Affine, DepthwiseProblem, DepthwiseSetupError, DepthwiseVariant};
pub use launch::{Strategy, launch, launch_ref};
