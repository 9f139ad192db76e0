#![forbid(unsafe_code)]

mod ai;
mod args;
mod build_info;
mod jsonrpc;
mod time;

pub(crate) use ai::*;
pub(crate) use args::*;
pub(crate) use build_info::*;
pub(crate) use jsonrpc::*;
pub(crate) use self::time::*;
