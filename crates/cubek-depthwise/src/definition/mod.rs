mod config;
mod error;
mod layout;
mod problem;
mod variant;

pub use config::*;
pub use error::*;
pub use layout::*;
pub use problem::*;
pub use variant::*;
