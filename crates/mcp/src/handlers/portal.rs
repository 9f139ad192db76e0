#![forbid(unsafe_code)]

//! Vendor portal: managers issue project-scoped tokens; vendors present one
//! with every call and may only touch milestones of that project.

use super::render::{
    evidence_json, issued_token_json, milestone_json, milestone_progress_json, overview_json,
    token_row_json,
};
use crate::*;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use mt_storage::{
    EvidenceUpload, IssueVendorTokenRequest, ListMilestonesRequest, ReportProgressRequest,
    RevokeVendorTokenRequest, SubmitForReviewRequest, UpdateVendorNotesRequest, VendorAccess,
};
use serde_json::{Value, json};

const DAY_MS: i64 = 86_400_000;
const MAX_TTL_DAYS: i64 = 3650;

fn vendor_actor(access: &VendorAccess) -> String {
    format!("vendor:{}", access.token_id)
}

fn parse_upload(index: usize, item: &Args) -> Result<EvidenceUpload, Value> {
    let file_name = require_string(item, "file_name")?;
    let encoded = require_string(item, "content_base64")?;
    let bytes = STANDARD.decode(encoded.trim()).map_err(|_| {
        ai_error(
            "INVALID_INPUT",
            &format!("files[{index}].content_base64 is not valid base64"),
        )
    })?;
    Ok(EvidenceUpload {
        file_name,
        mime_type: optional_string(item, "mime_type")?,
        description: optional_string(item, "description")?,
        bytes,
    })
}

impl McpServer {
    fn vendor_access(&self, args: &Args) -> Result<VendorAccess, Value> {
        let token = require_string(args, "token")?;
        self.store
            .verify_vendor_token(&token, now_ms_i64())
            .map_err(store_error)
    }

    pub(crate) fn tool_portal_issue(&mut self, args: &Args) -> Result<Value, Value> {
        let project_id = require_string(args, "project_id")?;
        let ttl_ms = match optional_i64(args, "ttl_days")? {
            None => self.token_ttl_ms,
            Some(days) if (1..=MAX_TTL_DAYS).contains(&days) => days * DAY_MS,
            Some(_) => {
                return Err(ai_error(
                    "INVALID_INPUT",
                    &format!("ttl_days must be between 1 and {MAX_TTL_DAYS}"),
                ));
            }
        };
        let issued = self
            .store
            .issue_vendor_token(IssueVendorTokenRequest {
                project_id,
                ttl_ms,
                now_ms: now_ms_i64(),
            })
            .map_err(store_error)?;
        Ok(ai_ok_with_warnings(
            "portal_issue",
            json!({ "token": issued_token_json(&issued) }),
            vec![warning(
                "TOKEN_SHOWN_ONCE",
                "The token string is not stored and cannot be shown again.",
                "Hand it to the vendor now; revoke and reissue if it is lost.",
            )],
            Vec::new(),
        ))
    }

    pub(crate) fn tool_portal_revoke(&mut self, args: &Args) -> Result<Value, Value> {
        let token_id = require_string(args, "token_id")?;
        let now_ms = now_ms_i64();
        let row = self
            .store
            .revoke_vendor_token(RevokeVendorTokenRequest { token_id, now_ms })
            .map_err(store_error)?;
        Ok(ai_ok(
            "portal_revoke",
            json!({ "token": token_row_json(&row, now_ms) }),
        ))
    }

    pub(crate) fn tool_portal_tokens(&mut self, args: &Args) -> Result<Value, Value> {
        let project_id = require_string(args, "project_id")?;
        let now_ms = now_ms_i64();
        let rows = self
            .store
            .list_vendor_tokens(&project_id)
            .map_err(store_error)?;
        Ok(ai_ok(
            "portal_tokens",
            json!({
                "count": rows.len(),
                "tokens": rows.iter().map(|row| token_row_json(row, now_ms)).collect::<Vec<_>>()
            }),
        ))
    }

    pub(crate) fn tool_portal_open(&mut self, args: &Args) -> Result<Value, Value> {
        let access = self.vendor_access(args)?;
        let today = date_or(args, "as_of", today_utc())?;
        let overview = self
            .store
            .project_overview(&access.project_id, today)
            .map_err(store_error)?;
        let milestones = self
            .store
            .list_milestones(ListMilestonesRequest {
                project_id: Some(access.project_id.clone()),
                status: None,
                today,
            })
            .map_err(store_error)?;
        Ok(ai_ok(
            "portal_open",
            json!({
                "token_id": access.token_id,
                "expires_at": ts_ms_to_rfc3339(access.expires_at_ms),
                "project": overview_json(&overview),
                "milestones": milestones
                    .iter()
                    .map(|row| milestone_progress_json(row, today))
                    .collect::<Vec<_>>()
            }),
        ))
    }

    pub(crate) fn tool_portal_notes(&mut self, args: &Args) -> Result<Value, Value> {
        let access = self.vendor_access(args)?;
        let milestone_id = require_string(args, "milestone_id")?;
        let notes = require_string(args, "notes")?;
        let milestone = self
            .store
            .portal_milestone(&access, &milestone_id)
            .map_err(store_error)?;
        let row = self
            .store
            .update_vendor_notes(UpdateVendorNotesRequest {
                milestone_id: milestone.id,
                notes,
                now_ms: now_ms_i64(),
            })
            .map_err(store_error)?;
        Ok(ai_ok(
            "portal_notes",
            json!({ "milestone": milestone_json(&row, today_utc()) }),
        ))
    }

    pub(crate) fn tool_portal_progress(&mut self, args: &Args) -> Result<Value, Value> {
        let access = self.vendor_access(args)?;
        let milestone_id = require_string(args, "milestone_id")?;
        let completion_percentage = require_f64(args, "completion_percentage")?;
        let expected_revision = optional_i64(args, "expected_revision")?;
        let milestone = self
            .store
            .portal_milestone(&access, &milestone_id)
            .map_err(store_error)?;
        let row = self
            .store
            .report_progress(ReportProgressRequest {
                milestone_id: milestone.id,
                completion_percentage,
                expected_revision,
                reported_by: vendor_actor(&access),
                now_ms: now_ms_i64(),
            })
            .map_err(store_error)?;
        Ok(ai_ok(
            "portal_progress",
            json!({ "milestone": milestone_json(&row, today_utc()) }),
        ))
    }

    pub(crate) fn tool_portal_submit(&mut self, args: &Args) -> Result<Value, Value> {
        let access = self.vendor_access(args)?;
        let milestone_id = require_string(args, "milestone_id")?;
        let files = optional_object_list(args, "files")?
            .into_iter()
            .enumerate()
            .map(|(index, item)| parse_upload(index, item))
            .collect::<Result<Vec<_>, _>>()?;
        let notes = optional_string(args, "notes")?;
        let expected_revision = optional_i64(args, "expected_revision")?;
        let milestone = self
            .store
            .portal_milestone(&access, &milestone_id)
            .map_err(store_error)?;

        let receipt = self
            .store
            .submit_for_review(SubmitForReviewRequest {
                milestone_id: milestone.id,
                files,
                notes,
                uploaded_by: vendor_actor(&access),
                expected_revision,
                now_ms: now_ms_i64(),
            })
            .map_err(store_error)?;
        Ok(ai_ok(
            "portal_submit",
            json!({
                "milestone": milestone_json(&receipt.milestone, today_utc()),
                "evidence": receipt.evidence.iter().map(evidence_json).collect::<Vec<_>>()
            }),
        ))
    }
}
