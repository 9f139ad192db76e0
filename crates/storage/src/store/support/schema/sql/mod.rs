#![forbid(unsafe_code)]

mod core;
mod directory;
mod evidence;
mod indexes;
mod milestones;
mod portal;
mod pragmas;
mod projects;
mod schedules;

pub(super) fn full_schema_sql() -> String {
    let mut sql = String::new();
    sql.push_str(pragmas::SQL);
    sql.push_str(core::SQL);
    sql.push_str(directory::SQL);
    sql.push_str(projects::SQL);
    sql.push_str(milestones::SQL);
    sql.push_str(evidence::SQL);
    sql.push_str(schedules::SQL);
    sql.push_str(portal::SQL);
    sql.push_str(indexes::SQL);
    sql
}
