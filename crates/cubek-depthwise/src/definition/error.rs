use core::fmt::{Debug, Display};

use cubecl::server::LaunchError;

use crate::definition::DepthwiseVariant;

/// Errors that can occur while preparing a depthwise convolution launch.
///
/// Kernels are unchecked, so every shape or resource problem must be caught here.
pub enum DepthwiseSetupError {
    /// No compiled variant covers the given filter, input resolution and stride.
    UnsupportedShape {
        filter: (usize, usize),
        input: (usize, usize),
        stride: usize,
        padding: usize,
    },

    /// A forced variant does not match the problem it was asked to solve.
    VariantMismatch {
        variant: DepthwiseVariant,
        reason: Box<dyn Display>,
    },

    /// The channel count is not a multiple of the variant's channel group.
    ChannelMultiple { channels: usize, group: usize },

    /// A tensor handle does not have the shape or the contiguous layout the kernel expects.
    InvalidHandle(Box<dyn Display>),

    /// The tile and filter scratch do not fit in the cube's shared memory.
    SharedMemoryLimit { required: usize, available: usize },

    /// The cube grid is larger than what the device accepts.
    CubeCountTooBig {
        requested: (usize, usize),
        max: (u32, u32),
    },

    /// The variant uses more units per cube than the device provides.
    CubeDimTooBig { requested: u32, max: u32 },

    /// The runtime refused the launch.
    Launch(LaunchError),
}

impl Display for DepthwiseSetupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DepthwiseSetupError::UnsupportedShape {
                filter,
                input,
                stride,
                padding,
            } => write!(
                f,
                "No depthwise variant for filter {}x{}, input {}x{}, stride {}, padding {}",
                filter.0, filter.1, input.0, input.1, stride, padding
            ),
            DepthwiseSetupError::VariantMismatch { variant, reason } => {
                write!(f, "Variant {variant} can't solve this problem: {reason}")
            }
            DepthwiseSetupError::ChannelMultiple { channels, group } => write!(
                f,
                "Channel count {channels} is not a multiple of the channel group {group}"
            ),
            DepthwiseSetupError::InvalidHandle(reason) => {
                write!(f, "Invalid tensor handle: {reason}")
            }
            DepthwiseSetupError::SharedMemoryLimit {
                required,
                available,
            } => write!(
                f,
                "Scratch needs {required} bytes of shared memory, device provides {available}"
            ),
            DepthwiseSetupError::CubeCountTooBig { requested, max } => write!(
                f,
                "Cube count {requested:?} exceeds the device maximum {max:?}"
            ),
            DepthwiseSetupError::CubeDimTooBig { requested, max } => write!(
                f,
                "Variant needs {requested} units per cube, device provides {max}"
            ),
            DepthwiseSetupError::Launch(err) => write!(f, "{err}"),
        }
    }
}

impl Debug for DepthwiseSetupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self}")
    }
}

impl From<LaunchError> for DepthwiseSetupError {
    fn from(value: LaunchError) -> Self {
        Self::Launch(value)
    }
}
