use core::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::definition::{DepthwiseConfig, DepthwiseProblem};

/// Fixed-shape depthwise kernels for the MobileNet-V2 and EfficientNet-B0 block families.
///
/// Names read as `K{filter}S{stride}In{input resolution}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepthwiseVariant {
    K3S1In112,
    K3S2In112,
    K3S1In56,
    K3S2In56,
    K3S1In28,
    K3S2In28,
    K3S1In14,
    K3S2In14,
    K3S1In7,
    K5S2In56,
    K5S1In28,
    K5S1In14,
    K5S2In14,
    K5S1In7,
}

/// Shape family and work split of a variant.
struct VariantShape {
    filter: usize,
    input: usize,
    stride: usize,
    channel_group: usize,
    bands: usize,
    strips: usize,
}

impl DepthwiseVariant {
    pub const ALL: [DepthwiseVariant; 14] = [
        DepthwiseVariant::K3S1In112,
        DepthwiseVariant::K3S2In112,
        DepthwiseVariant::K3S1In56,
        DepthwiseVariant::K3S2In56,
        DepthwiseVariant::K3S1In28,
        DepthwiseVariant::K3S2In28,
        DepthwiseVariant::K3S1In14,
        DepthwiseVariant::K3S2In14,
        DepthwiseVariant::K3S1In7,
        DepthwiseVariant::K5S2In56,
        DepthwiseVariant::K5S1In28,
        DepthwiseVariant::K5S1In14,
        DepthwiseVariant::K5S2In14,
        DepthwiseVariant::K5S1In7,
    ];

    pub fn all() -> impl Iterator<Item = DepthwiseVariant> {
        Self::ALL.into_iter()
    }

    /// Variant compiled for a square `filter` over a square `input` at `stride`.
    pub fn find(filter: usize, input: usize, stride: usize) -> Option<DepthwiseVariant> {
        Self::all().find(|variant| {
            let shape = variant.shape();
            shape.filter == filter && shape.input == input && shape.stride == stride
        })
    }

    /// Variant able to run the problem, without checking the channel multiple.
    pub fn for_problem(problem: &DepthwiseProblem) -> Option<DepthwiseVariant> {
        if problem.filter_h != problem.filter_w
            || problem.in_h != problem.in_w
            || problem.padding != problem.filter_h / 2
        {
            return None;
        }

        Self::find(problem.filter_h, problem.in_h, problem.stride)
    }

    pub fn config(&self) -> DepthwiseConfig {
        let shape = self.shape();

        DepthwiseConfig {
            filter_size: shape.filter,
            stride: shape.stride,
            padding: shape.filter / 2,
            in_h: shape.input,
            in_w: shape.input,
            channel_group: shape.channel_group,
            bands: shape.bands,
            strips: shape.strips,
        }
    }

    pub fn filter_size(&self) -> usize {
        self.shape().filter
    }

    pub fn input_size(&self) -> usize {
        self.shape().input
    }

    pub fn stride(&self) -> usize {
        self.shape().stride
    }

    pub fn channel_group(&self) -> usize {
        self.shape().channel_group
    }

    fn shape(&self) -> VariantShape {
        let (filter, input, stride, channel_group, bands, strips) = match self {
            DepthwiseVariant::K3S1In112 => (3, 112, 1, 1, 4, 2),
            DepthwiseVariant::K3S2In112 => (3, 112, 2, 1, 2, 4),
            DepthwiseVariant::K3S1In56 => (3, 56, 1, 1, 1, 4),
            DepthwiseVariant::K3S2In56 => (3, 56, 2, 2, 1, 4),
            DepthwiseVariant::K3S1In28 => (3, 28, 1, 8, 1, 1),
            DepthwiseVariant::K3S2In28 => (3, 28, 2, 8, 1, 1),
            DepthwiseVariant::K3S1In14 => (3, 14, 1, 16, 1, 1),
            DepthwiseVariant::K3S2In14 => (3, 14, 2, 32, 1, 1),
            DepthwiseVariant::K3S1In7 => (3, 7, 1, 32, 1, 1),
            DepthwiseVariant::K5S2In56 => (5, 56, 2, 2, 1, 4),
            DepthwiseVariant::K5S1In28 => (5, 28, 1, 8, 1, 1),
            DepthwiseVariant::K5S1In14 => (5, 14, 1, 16, 1, 1),
            DepthwiseVariant::K5S2In14 => (5, 14, 2, 32, 1, 1),
            DepthwiseVariant::K5S1In7 => (5, 7, 1, 32, 1, 1),
        };

        VariantShape {
            filter,
            input,
            stride,
            channel_group,
            bands,
            strips,
        }
    }
}

impl Display for DepthwiseVariant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let shape = self.shape();
        write!(
            f,
            "filter{}x{}_input{}x{}_stride{}",
            shape.filter, shape.filter, shape.input, shape.input, shape.stride
        )
    }
}
