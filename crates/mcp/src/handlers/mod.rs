#![forbid(unsafe_code)]

mod analytics;
mod definitions;
mod directory;
mod dispatch;
mod milestones;
mod portal;
mod projects;
mod render;
mod schedules;

pub(crate) use definitions::tool_definitions;
pub(crate) use dispatch::{dispatch_tool, unknown_tool};
