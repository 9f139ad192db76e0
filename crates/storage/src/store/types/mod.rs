#![forbid(unsafe_code)]

mod analytics;
mod directory;
mod milestones;
mod portal;
mod projects;
mod schedules;

pub use analytics::*;
pub use directory::*;
pub use milestones::*;
pub use portal::*;
pub use projects::*;
pub use schedules::*;
