#![cfg(feature = "test-runtime")]
#![allow(missing_docs)]

pub mod suite;

mod properties;
mod variants;
