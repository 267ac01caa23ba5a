use cubecl::{CubeCount, CubeDim, Runtime, client::ComputeClient};

use crate::{
    definition::{DepthwiseConfig, DepthwiseProblem, DepthwiseSetupError, DepthwiseVariant},
    launch::Strategy,
};

/// Everything needed to launch a validated depthwise problem.
#[derive(Debug, Clone)]
pub struct DepthwiseLaunchSettings {
    pub variant: DepthwiseVariant,
    pub config: DepthwiseConfig,
    pub cube_count: CubeCount,
    pub cube_dim: CubeDim,
}

/// Device limits relevant to a depthwise launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceLimits {
    pub max_shared_memory_size: usize,
    pub max_cube_count: (u32, u32, u32),
    pub max_units_per_cube: u32,
}

impl DeviceLimits {
    pub fn from_client<R: Runtime>(client: &ComputeClient<R>) -> Self {
        let hardware = &client.properties().hardware;

        Self {
            max_shared_memory_size: hardware.max_shared_memory_size,
            max_cube_count: hardware.max_cube_count,
            max_units_per_cube: hardware.max_units_per_cube,
        }
    }
}

/// Selects the variant for a problem and checks it against the device.
pub fn prepare(
    problem: &DepthwiseProblem,
    strategy: &Strategy,
    limits: &DeviceLimits,
    elem_size: usize,
) -> Result<DepthwiseLaunchSettings, DepthwiseSetupError> {
    let variant = strategy.select(problem)?;
    let config = variant.config();

    check_channels(problem, &config)?;
    check_device(problem, &config, limits, elem_size)?;

    Ok(DepthwiseLaunchSettings {
        variant,
        config,
        cube_count: config.cube_count(problem.batch, problem.channels),
        cube_dim: config.cube_dim(),
    })
}

fn check_channels(
    problem: &DepthwiseProblem,
    config: &DepthwiseConfig,
) -> Result<(), DepthwiseSetupError> {
    if problem.channels == 0 || problem.channels % config.channel_group != 0 {
        return Err(DepthwiseSetupError::ChannelMultiple {
            channels: problem.channels,
            group: config.channel_group,
        });
    }

    Ok(())
}

fn check_device(
    problem: &DepthwiseProblem,
    config: &DepthwiseConfig,
    limits: &DeviceLimits,
    elem_size: usize,
) -> Result<(), DepthwiseSetupError> {
    let required = config.scratch_bytes(elem_size);
    if required > limits.max_shared_memory_size {
        return Err(DepthwiseSetupError::SharedMemoryLimit {
            required,
            available: limits.max_shared_memory_size,
        });
    }

    let lanes = config.lanes() as u32;
    if lanes > limits.max_units_per_cube {
        return Err(DepthwiseSetupError::CubeDimTooBig {
            requested: lanes,
            max: limits.max_units_per_cube,
        });
    }

    let (x, y) = config.cube_count_dims(problem.batch, problem.channels);
    let (max_x, max_y, _) = limits.max_cube_count;
    if x > max_x as usize || y > max_y as usize {
        return Err(DepthwiseSetupError::CubeCountTooBig {
            requested: (x, y),
            max: (max_x, max_y),
        });
    }

    Ok(())
}

/// Checks that a handle has the expected shape and a contiguous row-major layout.
///
/// Dimensions of size one may carry any stride.
pub fn check_handle(
    name: &str,
    shape: &[usize],
    strides: &[usize],
    expected: &[usize],
) -> Result<(), DepthwiseSetupError> {
    if shape != expected {
        return Err(DepthwiseSetupError::InvalidHandle(Box::new(format!(
            "{name} has shape {shape:?}, expected {expected:?}"
        ))));
    }

    let mut contiguous = 1;
    for (dim, stride) in shape.iter().zip(strides).rev() {
        if *dim != 1 && *stride != contiguous {
            return Err(DepthwiseSetupError::InvalidHandle(Box::new(format!(
                "{name} with strides {strides:?} is not contiguous"
            ))));
        }
        contiguous *= dim;
    }

    Ok(())
}

/// Checks that a handle stores elements of the size the kernel is compiled for.
pub fn check_elem_size(
    name: &str,
    elem_size: usize,
    expected: usize,
) -> Result<(), DepthwiseSetupError> {
    if elem_size != expected {
        return Err(DepthwiseSetupError::InvalidHandle(Box::new(format!(
            "{name} stores {elem_size}-byte elements, the kernel element type has {expected}"
        ))));
    }

    Ok(())
}

/// Filters are accepted as `[channels, 1, k, k]` or `[channels, k, k]`.
pub fn check_filter_handle(
    problem: &DepthwiseProblem,
    shape: &[usize],
    strides: &[usize],
) -> Result<(), DepthwiseSetupError> {
    let full = problem.filter_shape();
    if shape.len() == 3 {
        check_handle("filter", shape, strides, &[full[0], full[2], full[3]])
    } else {
        check_handle("filter", shape, strides, &full)
    }
}
