#![forbid(unsafe_code)]

mod transition;

pub use transition::*;
