mod base;
mod setup;
mod strategy;

pub use base::*;
pub use setup::*;
pub use strategy::*;
