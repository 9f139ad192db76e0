#![forbid(unsafe_code)]

mod config;
pub(crate) mod framing;
mod stdio;

pub(crate) use config::{Invocation, ServerConfig, parse_invocation};
pub(crate) use stdio::run_stdio;
