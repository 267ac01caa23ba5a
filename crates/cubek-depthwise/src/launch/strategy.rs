use core::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::definition::{DepthwiseProblem, DepthwiseSetupError, DepthwiseVariant};

/// How the kernel variant is chosen for a problem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Pick the variant compiled for the problem's shape family.
    #[default]
    Auto,
    /// Use the given variant. The problem is still checked against it.
    Forced(DepthwiseVariant),
}

impl Strategy {
    pub fn select(
        &self,
        problem: &DepthwiseProblem,
    ) -> Result<DepthwiseVariant, DepthwiseSetupError> {
        match self {
            Strategy::Auto => DepthwiseVariant::for_problem(problem).ok_or(
                DepthwiseSetupError::UnsupportedShape {
                    filter: (problem.filter_h, problem.filter_w),
                    input: (problem.in_h, problem.in_w),
                    stride: problem.stride,
                    padding: problem.padding,
                },
            ),
            Strategy::Forced(variant) => match DepthwiseVariant::for_problem(problem) {
                Some(found) if found == *variant => Ok(found),
                _ => Err(DepthwiseSetupError::VariantMismatch {
                    variant: *variant,
                    reason: Box::new(format!(
                        "problem is filter {}x{}, input {}x{}, stride {}, padding {}",
                        problem.filter_h,
                        problem.filter_w,
                        problem.in_h,
                        problem.in_w,
                        problem.stride,
                        problem.padding
                    )),
                }),
            },
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Strategy::Auto => f.write_str("auto"),
            Strategy::Forced(variant) => write!(f, "forced_{variant}"),
        }
    }
}
