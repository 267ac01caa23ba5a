use cubecl::{
    Runtime,
    client::ComputeClient,
    ir::StorageType,
    prelude::{ArrayArg, ScalarArg, TensorHandleRef},
    std::tensor::TensorHandle,
};

use crate::{
    definition::{Affine, DepthwiseProblem, DepthwiseSetupError, TensorLayout},
    kernels::depthwise_conv2d,
    launch::{
        DeviceLimits, Strategy, check_elem_size, check_filter_handle, check_handle, prepare,
    },
};

/// Launches a depthwise convolution on owned handles.
///
/// The element type is taken from the output handle.
pub fn launch<R: Runtime>(
    strategy: &Strategy,
    client: &ComputeClient<R>,
    input: TensorHandle<R>,
    filter: TensorHandle<R>,
    output: TensorHandle<R>,
    problem: &DepthwiseProblem,
    affine: Affine,
) -> Result<(), DepthwiseSetupError> {
    launch_ref(
        strategy,
        client,
        &input.as_ref(),
        &filter.as_ref(),
        &output.as_ref(),
        problem,
        affine,
        output.dtype,
    )
}

/// Launches a depthwise convolution.
///
/// `input` is `[batch, channels, h, w]`, `filter` is `[channels, 1, k, k]` (or
/// `[channels, k, k]`) and `output` is `[batch, channels, out_h, out_w]`, all contiguous
/// and of element type `dtype`. Every output element is overwritten with
/// `conv * affine.alpha + affine.beta`.
#[allow(clippy::too_many_arguments)]
pub fn launch_ref<R: Runtime>(
    strategy: &Strategy,
    client: &ComputeClient<R>,
    input: &TensorHandleRef<R>,
    filter: &TensorHandleRef<R>,
    output: &TensorHandleRef<R>,
    problem: &DepthwiseProblem,
    affine: Affine,
    dtype: StorageType,
) -> Result<(), DepthwiseSetupError> {
    let limits = DeviceLimits::from_client(client);

    let settings = check_handles(problem, input, filter, output, dtype.size())
        .and_then(|_| prepare(problem, strategy, &limits, dtype.size()))
        .inspect_err(|err| log::warn!("Depthwise setup failed: {err}"))?;

    log::debug!(
        "Launching depthwise {} ({strategy}) on {:?}, cube dim {:?}, {} bytes of scratch",
        settings.variant,
        settings.cube_count,
        settings.cube_dim,
        settings.config.scratch_bytes(dtype.size()),
    );

    let elem_size = dtype.size();
    let input_len = TensorLayout::input(problem).len(problem.batch);
    let filter_len = problem.channels * problem.filter_h * problem.filter_w;
    let output_len = TensorLayout::output(problem).len(problem.batch);

    unsafe {
        depthwise_conv2d::launch_unchecked::<R>(
            client,
            settings.cube_count,
            settings.cube_dim,
            ArrayArg::from_raw_parts_and_size(input.handle, input_len, 1, elem_size),
            ArrayArg::from_raw_parts_and_size(filter.handle, filter_len, 1, elem_size),
            ArrayArg::from_raw_parts_and_size(output.handle, output_len, 1, elem_size),
            ScalarArg::new(problem.channels),
            ScalarArg::new(affine.alpha),
            ScalarArg::new(affine.beta),
            settings.config,
            dtype,
        )
    }?;

    Ok(())
}

fn check_handles<R: Runtime>(
    problem: &DepthwiseProblem,
    input: &TensorHandleRef<R>,
    filter: &TensorHandleRef<R>,
    output: &TensorHandleRef<R>,
    elem_size: usize,
) -> Result<(), DepthwiseSetupError> {
    check_elem_size("input", input.elem_size, elem_size)?;
    check_elem_size("filter", filter.elem_size, elem_size)?;
    check_elem_size("output", output.elem_size, elem_size)?;
    check_handle("input", input.shape, input.strides, &problem.input_shape())?;
    check_filter_handle(problem, filter.shape, filter.strides)?;
    check_handle("output", output.shape, output.strides, &problem.output_shape())
}
