#![forbid(unsafe_code)]

mod decide;
mod submit;
