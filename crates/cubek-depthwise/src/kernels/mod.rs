mod depthwise;

pub use depthwise::*;
