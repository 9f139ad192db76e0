#![forbid(unsafe_code)]

use super::super::milestones::milestone_record_id;
use super::super::*;
use mt_core::ids::RecordKind;
use mt_core::lifecycle::MilestoneAction;

struct ReviewArgs<'a> {
    milestone_id: &'a str,
    expected_revision: Option<i64>,
    reviewed_by: Option<&'a str>,
    action: MilestoneAction,
    event_type: &'static str,
    now_ms: i64,
}

impl SqliteStore {
    /// Approves a submission: status `approved`, completion forced to 100.
    /// Approving an already approved milestone succeeds without changing it.
    pub fn approve_milestone(
        &mut self,
        request: ApproveMilestoneRequest,
    ) -> Result<MilestoneRow, StoreError> {
        self.review(ReviewArgs {
            milestone_id: &request.milestone_id,
            expected_revision: request.expected_revision,
            reviewed_by: request.reviewed_by.as_deref(),
            action: MilestoneAction::Approve,
            event_type: "approved",
            now_ms: request.now_ms,
        })
    }

    /// Rejects a submission with a non-empty reason; completion drops to 0.
    pub fn reject_milestone(
        &mut self,
        request: RejectMilestoneRequest,
    ) -> Result<MilestoneRow, StoreError> {
        self.review(ReviewArgs {
            milestone_id: &request.milestone_id,
            expected_revision: request.expected_revision,
            reviewed_by: request.reviewed_by.as_deref(),
            action: MilestoneAction::Reject {
                reason: request.reason,
            },
            event_type: "rejected",
            now_ms: request.now_ms,
        })
    }

    fn review(&mut self, args: ReviewArgs<'_>) -> Result<MilestoneRow, StoreError> {
        let milestone_id = milestone_record_id(args.milestone_id)?;
        let reviewer = args
            .reviewed_by
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|id| ensure_reviewer(&self.conn, id))
            .transpose()?;

        let tx = self.conn.transaction()?;
        let (before, after) = transition_milestone_tx(
            &tx,
            TransitionTxArgs {
                milestone_id: &milestone_id,
                expected_revision: args.expected_revision,
                action: &args.action,
                vendor_notes: None,
                now_ms: args.now_ms,
            },
        )?;
        emit_milestone_event_tx(
            &tx,
            MilestoneEventArgs {
                milestone_id: &milestone_id,
                now_ms: args.now_ms,
                event_type: args.event_type,
                actor: reviewer.as_deref(),
                payload: serde_json::json!({
                    "from": before.status.as_str(),
                    "to": after.status.as_str(),
                    "rejection_reason": after.rejection_reason,
                }),
            },
        )?;
        tx.commit()?;

        tracing::info!(
            milestone_id = %milestone_id,
            action = args.action.name(),
            from = %before.status,
            to = %after.status,
            "milestone reviewed"
        );
        Ok(after)
    }
}

fn ensure_reviewer(conn: &Connection, user_id: &str) -> Result<String, StoreError> {
    let user_id = record_id(
        RecordKind::User,
        user_id,
        "reviewed_by must look like USR-<number>",
    )?;
    let user = load_user(conn, &user_id)?;
    if !user.is_active || !user.role.can_review() {
        return Err(StoreError::InvalidInput(
            "reviewer must be an active admin or project manager",
        ));
    }
    Ok(user.id)
}
