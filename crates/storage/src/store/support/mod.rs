#![forbid(unsafe_code)]

mod counters;
mod events;
mod input;
mod milestone_tx;
mod rows;
mod schema;

pub(super) use counters::*;
pub(super) use events::*;
pub(super) use input::*;
pub(super) use milestone_tx::*;
pub(super) use rows::*;
pub(super) use schema::migrate_sqlite_schema;
