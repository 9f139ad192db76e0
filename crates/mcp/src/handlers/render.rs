#![forbid(unsafe_code)]

//! JSON views of store rows. Dates render as `YYYY-MM-DD`, timestamps as
//! RFC 3339 with the raw milliseconds alongside, percentages rounded to one
//! decimal place.

use crate::ts_ms_to_rfc3339;
use mt_core::dates::CalendarDate;
use mt_core::progress::{ProjectRollup, round1};
use mt_storage::{
    ActivityRow, EvidenceRow, IssuedVendorToken, MilestoneEventRow, MilestoneProgressRow,
    MilestoneRow, MilestoneTemplateRow, OrganizationRow, ProjectOverview, ProjectRow, PurchaseOrderRow, ScheduleRow,
    UserRow, VendorTokenRow,
};
use serde_json::{Value, json};

fn date(value: Option<CalendarDate>) -> Value {
    value.map_or(Value::Null, |d| Value::String(d.to_string()))
}

fn ts(ts_ms: i64) -> Value {
    Value::String(ts_ms_to_rfc3339(ts_ms))
}

pub(super) fn organization_json(row: &OrganizationRow) -> Value {
    json!({
        "id": row.id,
        "name": row.name,
        "org_type": row.org_type.as_str(),
        "country": row.country,
        "address": row.address,
        "contact_email": row.contact_email,
        "contact_phone": row.contact_phone,
        "tax_id": row.tax_id,
        "created_at": ts(row.created_at_ms)
    })
}

pub(super) fn user_json(row: &UserRow) -> Value {
    json!({
        "id": row.id,
        "email": row.email,
        "full_name": row.full_name(),
        "first_name": row.first_name,
        "last_name": row.last_name,
        "role": row.role.as_str(),
        "organization_id": row.organization_id,
        "is_active": row.is_active,
        "created_at": ts(row.created_at_ms)
    })
}

pub(super) fn project_json(row: &ProjectRow) -> Value {
    json!({
        "id": row.id,
        "name": row.name,
        "description": row.description,
        "client_id": row.client_id,
        "project_manager_id": row.project_manager_id,
        "vendor_id": row.vendor_id,
        "status": row.status.as_str(),
        "start_date": date(row.start_date),
        "end_date": date(row.end_date),
        "budget": row.budget,
        "currency": row.currency,
        "revision": row.revision,
        "created_at": ts(row.created_at_ms),
        "updated_at": ts(row.updated_at_ms)
    })
}

pub(super) fn rollup_json(rollup: &ProjectRollup) -> Value {
    json!({
        "total_milestones": rollup.total_milestones,
        "completed_percentage": round1(rollup.completed_percentage),
        "overdue_milestones": rollup.overdue_milestones,
        "approved_milestones": rollup.approved_milestones,
        "pending_review_milestones": rollup.pending_review_milestones,
        "weight_total": round1(rollup.weight_total)
    })
}

pub(super) fn overview_json(overview: &ProjectOverview) -> Value {
    json!({
        "project": project_json(&overview.project),
        "client_name": overview.client_name,
        "vendor_name": overview.vendor_name,
        "manager_name": overview.manager_name,
        "purchase_orders": overview.purchase_orders,
        "progress": rollup_json(&overview.rollup)
    })
}

pub(super) fn purchase_order_json(row: &PurchaseOrderRow) -> Value {
    json!({
        "id": row.id,
        "po_number": row.po_number,
        "project_id": row.project_id,
        "vendor_id": row.vendor_id,
        "title": row.title,
        "description": row.description,
        "total_amount": row.total_amount,
        "currency": row.currency,
        "status": row.status.as_str(),
        "issue_date": date(row.issue_date),
        "expected_delivery_date": date(row.expected_delivery_date),
        "created_at": ts(row.created_at_ms)
    })
}

pub(super) fn milestone_json(row: &MilestoneRow, today: CalendarDate) -> Value {
    json!({
        "id": row.id,
        "project_id": row.project_id,
        "purchase_order_id": row.purchase_order_id,
        "name": row.name,
        "description": row.description,
        "weight_percentage": row.weight_percentage,
        "completion_percentage": round1(row.completion_percentage),
        "status": row.status.as_str(),
        "display_status": row.display_status(today).as_str(),
        "is_overdue": row.is_overdue(today),
        "due_date": date(row.due_date),
        "completed_date": date(row.completed_date),
        "vendor_notes": row.vendor_notes,
        "rejection_reason": row.rejection_reason,
        "evidence_required": row.evidence_required,
        "template_id": row.template_id,
        "revision": row.revision,
        "updated_at": ts(row.updated_at_ms)
    })
}

pub(super) fn template_json(row: &MilestoneTemplateRow) -> Value {
    json!({
        "id": row.id,
        "name": row.name,
        "description": row.description,
        "default_weight_percentage": row.default_weight_percentage,
        "default_evidence_required": row.default_evidence_required,
        "created_at": ts(row.created_at_ms)
    })
}

pub(super) fn milestone_progress_json(row: &MilestoneProgressRow, today: CalendarDate) -> Value {
    let mut value = milestone_json(&row.milestone, today);
    if let Some(obj) = value.as_object_mut() {
        obj.insert("project_name".to_string(), json!(row.project_name));
        obj.insert("po_number".to_string(), json!(row.po_number));
        obj.insert("evidence_count".to_string(), json!(row.evidence_count));
    }
    value
}

pub(super) fn evidence_json(row: &EvidenceRow) -> Value {
    json!({
        "id": row.id,
        "milestone_id": row.milestone_id,
        "file_name": row.file_name,
        "file_path": row.file_path,
        "mime_type": row.mime_type,
        "file_size": row.file_size,
        "description": row.description,
        "uploaded_by": row.uploaded_by,
        "uploaded_at": ts(row.uploaded_at_ms),
        "public_url": row.public_url
    })
}

pub(super) fn event_json(row: &MilestoneEventRow) -> Value {
    let payload = serde_json::from_str::<Value>(&row.payload_json)
        .unwrap_or_else(|_| Value::String(row.payload_json.clone()));
    json!({
        "event_id": row.event_id(),
        "milestone_id": row.milestone_id,
        "ts": ts(row.ts_ms),
        "ts_ms": row.ts_ms,
        "type": row.event_type,
        "actor": row.actor,
        "payload": payload
    })
}

fn activity_json(row: &ActivityRow) -> Value {
    json!({
        "id": row.id,
        "ordinal": row.ordinal,
        "name": row.name,
        "description": row.description,
        "activity_type": row.activity_type.as_str(),
        "start_date": date(row.start_date),
        "end_date": date(row.end_date),
        "duration_days": row.duration_days,
        "progress_percentage": round1(row.progress_percentage),
        "status": row.status.as_str()
    })
}

pub(super) fn schedule_json(row: &ScheduleRow) -> Value {
    json!({
        "id": row.id,
        "project_id": row.project_id,
        "name": row.name,
        "description": row.description,
        "start_date": date(row.start_date),
        "end_date": date(row.end_date),
        "status": row.status.as_str(),
        "created_at": ts(row.created_at_ms),
        "activities": row.activities.iter().map(activity_json).collect::<Vec<_>>()
    })
}

pub(super) fn issued_token_json(token: &IssuedVendorToken) -> Value {
    json!({
        "token_id": token.token_id,
        "project_id": token.project_id,
        "token": token.token,
        "issued_at": ts(token.issued_at_ms),
        "expires_at": ts(token.expires_at_ms)
    })
}

pub(super) fn token_row_json(row: &VendorTokenRow, now_ms: i64) -> Value {
    let state = if row.revoked_at_ms.is_some() {
        "revoked"
    } else if now_ms >= row.expires_at_ms {
        "expired"
    } else {
        "active"
    };
    json!({
        "token_id": row.token_id,
        "project_id": row.project_id,
        "state": state,
        "issued_at": ts(row.issued_at_ms),
        "expires_at": ts(row.expires_at_ms),
        "revoked_at": row.revoked_at_ms.map(ts)
    })
}
