//! Helpers shared by the kernel test suites: host tensors, tolerance checks, and the
//! `CUBE_TEST_MODE` switch.

mod correctness;
mod host_data;
mod test_mode;

pub use correctness::*;
pub use host_data::*;
pub use test_mode::*;
