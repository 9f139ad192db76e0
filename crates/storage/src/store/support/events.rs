#![forbid(unsafe_code)]

use super::super::{MilestoneEventRow, StoreError};
use rusqlite::{Transaction, params};

pub(in crate::store) struct MilestoneEventArgs<'a> {
    pub milestone_id: &'a str,
    pub now_ms: i64,
    pub event_type: &'a str,
    pub actor: Option<&'a str>,
    pub payload: serde_json::Value,
}

pub(in crate::store) fn emit_milestone_event_tx(
    tx: &Transaction<'_>,
    args: MilestoneEventArgs<'_>,
) -> Result<MilestoneEventRow, StoreError> {
    let payload_json = args.payload.to_string();
    tx.execute(
        r#"
        INSERT INTO milestone_events(milestone_id, ts_ms, event_type, actor, payload_json)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![
            args.milestone_id,
            args.now_ms,
            args.event_type,
            args.actor,
            &payload_json
        ],
    )?;
    Ok(MilestoneEventRow {
        seq: tx.last_insert_rowid(),
        milestone_id: args.milestone_id.to_string(),
        ts_ms: args.now_ms,
        event_type: args.event_type.to_string(),
        actor: args.actor.map(str::to_string),
        payload_json,
    })
}
