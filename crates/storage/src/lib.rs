#![forbid(unsafe_code)]

mod bucket;
mod store;

pub use bucket::{EvidenceBucket, FsBucket};
pub use store::*;
