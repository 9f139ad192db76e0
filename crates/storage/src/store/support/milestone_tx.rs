#![forbid(unsafe_code)]

use super::super::{MilestoneRow, StoreError};
use super::input::check_revision;
use super::rows::load_milestone;
use mt_core::dates::CalendarDate;
use mt_core::lifecycle::{MilestoneAction, transition};
use rusqlite::{Transaction, params};

pub(in crate::store) struct TransitionTxArgs<'a> {
    pub milestone_id: &'a str,
    pub expected_revision: Option<i64>,
    pub action: &'a MilestoneAction,
    pub vendor_notes: Option<&'a str>,
    pub now_ms: i64,
}

/// Loads the row, checks the revision guard, runs the state machine and
/// writes the result back with a bumped revision. Returns `(before, after)`.
pub(in crate::store) fn transition_milestone_tx(
    tx: &Transaction<'_>,
    args: TransitionTxArgs<'_>,
) -> Result<(MilestoneRow, MilestoneRow), StoreError> {
    let before = load_milestone(tx, args.milestone_id)?;
    check_revision(args.expected_revision, before.revision)?;

    let today = CalendarDate::from_unix_ms(args.now_ms);
    let next = transition(&before.state(), args.action, today)?;

    let after = MilestoneRow {
        status: next.status,
        completion_percentage: next.completion_percentage,
        rejection_reason: next.rejection_reason,
        completed_date: next.completed_date,
        vendor_notes: args
            .vendor_notes
            .map(str::to_string)
            .or_else(|| before.vendor_notes.clone()),
        revision: before.revision + 1,
        updated_at_ms: args.now_ms,
        ..before.clone()
    };
    write_milestone_state_tx(tx, &after)?;
    Ok((before, after))
}

pub(in crate::store) fn write_milestone_state_tx(
    tx: &Transaction<'_>,
    row: &MilestoneRow,
) -> Result<(), StoreError> {
    tx.execute(
        r#"
        UPDATE milestones
        SET status=?2, completion_percentage=?3, rejection_reason=?4, completed_date=?5,
            vendor_notes=?6, revision=?7, updated_at_ms=?8
        WHERE id=?1
        "#,
        params![
            &row.id,
            row.status.as_str(),
            row.completion_percentage,
            row.rejection_reason.as_deref(),
            row.completed_date.map(|d| d.to_string()),
            row.vendor_notes.as_deref(),
            row.revision,
            row.updated_at_ms,
        ],
    )?;
    Ok(())
}
