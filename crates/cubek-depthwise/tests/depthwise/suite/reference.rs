use cubek_depthwise::{Affine, DepthwiseProblem};
use cubek_test_utils::{HostData, HostDataType, ValidationResult, assert_equals_approx};

pub fn assert_result(
    input: &HostData,
    filter: &HostData,
    problem: &DepthwiseProblem,
    affine: Affine,
    dtype: HostDataType,
    actual: &HostData,
) -> ValidationResult {
    let epsilon = depthwise_epsilon(dtype, problem, 32.);
    let expected = depthwise_cpu_reference(input, filter, problem, affine).quantized(dtype);

    match assert_equals_approx(actual, &expected, epsilon) {
        Ok(()) => ValidationResult::Pass,
        Err(reason) => ValidationResult::Fail(reason),
    }
}

/// Tolerance for a sum of `filter_h * filter_w` products stored in `dtype`.
fn depthwise_epsilon(dtype: HostDataType, problem: &DepthwiseProblem, safety_factor: f32) -> f32 {
    let taps = (problem.filter_h * problem.filter_w) as f32;
    dtype.epsilon() * taps.sqrt() * safety_factor
}

/// Solves a depthwise convolution problem.
///
/// Naive nested loops over `[n, c, oh, ow]` then `[kh, kw]`, padding read as zeros.
/// Only meant for checking kernels.
pub fn depthwise_cpu_reference(
    input: &HostData,
    filter: &HostData,
    problem: &DepthwiseProblem,
    affine: Affine,
) -> HostData {
    let padding = problem.padding as isize;

    HostData::from_fn(problem.output_shape().to_vec(), |index| {
        let [n, c, oh, ow] = [index[0], index[1], index[2], index[3]];
        let mut sum = 0.0f32;

        for kh in 0..problem.filter_h {
            for kw in 0..problem.filter_w {
                let ih = (oh * problem.stride + kh) as isize - padding;
                let iw = (ow * problem.stride + kw) as isize - padding;
                let x = if ih < 0
                    || iw < 0
                    || ih as usize >= problem.in_h
                    || iw as usize >= problem.in_w
                {
                    0.0
                } else {
                    input.get(&[n, c, ih as usize, iw as usize])
                };

                sum += x * filter.get(&[c, 0, kh, kw]);
            }
        }

        affine.apply(sum)
    })
}
