mod macros;
mod reference;

pub use launcher::*;
pub use reference::*;
