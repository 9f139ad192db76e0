#![forbid(unsafe_code)]

use super::super::*;
use super::milestone_record_id;
use mt_core::lifecycle::MilestoneAction;

impl SqliteStore {
    /// Overwrites the vendor's free-text notes. No status change.
    pub fn update_vendor_notes(
        &mut self,
        request: UpdateVendorNotesRequest,
    ) -> Result<MilestoneRow, StoreError> {
        let UpdateVendorNotesRequest {
            milestone_id,
            notes,
            now_ms,
        } = request;
        let milestone_id = milestone_record_id(&milestone_id)?;

        let tx = self.conn.transaction()?;
        let current = load_milestone(&tx, &milestone_id)?;
        let row = MilestoneRow {
            vendor_notes: Some(notes),
            revision: current.revision + 1,
            updated_at_ms: now_ms,
            ..current
        };
        write_milestone_state_tx(&tx, &row)?;
        tx.commit()?;
        Ok(row)
    }

    pub fn report_progress(
        &mut self,
        request: ReportProgressRequest,
    ) -> Result<MilestoneRow, StoreError> {
        let ReportProgressRequest {
            milestone_id,
            completion_percentage,
            expected_revision,
            reported_by,
            now_ms,
        } = request;
        let milestone_id = milestone_record_id(&milestone_id)?;
        let reported_by = required_text(&reported_by, "reported_by must not be empty")?;
        let action = MilestoneAction::ReportProgress {
            completion_percentage,
        };

        let tx = self.conn.transaction()?;
        let (before, after) = transition_milestone_tx(
            &tx,
            TransitionTxArgs {
                milestone_id: &milestone_id,
                expected_revision,
                action: &action,
                vendor_notes: None,
                now_ms,
            },
        )?;
        emit_milestone_event_tx(
            &tx,
            MilestoneEventArgs {
                milestone_id: &milestone_id,
                now_ms,
                event_type: "progress_reported",
                actor: Some(&reported_by),
                payload: serde_json::json!({
                    "from": before.status.as_str(),
                    "to": after.status.as_str(),
                    "completion_percentage": after.completion_percentage,
                }),
            },
        )?;
        tx.commit()?;

        tracing::info!(
            milestone_id = %milestone_id,
            from = %before.status,
            to = %after.status,
            completion = after.completion_percentage,
            "progress reported"
        );
        Ok(after)
    }
}
