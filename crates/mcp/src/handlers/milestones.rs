#![forbid(unsafe_code)]

use super::render::{
    evidence_json, event_json, milestone_json, milestone_progress_json, template_json,
};
use crate::*;
use mt_core::model::MilestoneStatus;
use mt_storage::{
    ApproveMilestoneRequest, CreateMilestoneRequest, CreateMilestoneTemplateRequest,
    ListMilestonesRequest, RejectMilestoneRequest,
};
use serde_json::{Value, json};

impl McpServer {
    pub(crate) fn tool_milestones_create(&mut self, args: &Args) -> Result<Value, Value> {
        let request = CreateMilestoneRequest {
            project_id: require_string(args, "project_id")?,
            purchase_order_id: optional_string(args, "purchase_order_id")?,
            template_id: optional_string(args, "template_id")?,
            name: optional_string(args, "name")?.unwrap_or_default(),
            description: optional_string(args, "description")?,
            weight_percentage: optional_f64(args, "weight_percentage")?,
            due_date: optional_string(args, "due_date")?,
            evidence_required: optional_flag(args, "evidence_required")?,
            now_ms: now_ms_i64(),
        };
        let row = self.store.create_milestone(request).map_err(store_error)?;
        Ok(ai_ok(
            "milestones_create",
            json!({ "milestone": milestone_json(&row, today_utc()) }),
        ))
    }

    pub(crate) fn tool_milestone_templates_create(&mut self, args: &Args) -> Result<Value, Value> {
        let request = CreateMilestoneTemplateRequest {
            name: require_string(args, "name")?,
            description: optional_string(args, "description")?,
            default_weight_percentage: require_f64(args, "default_weight_percentage")?,
            default_evidence_required: flag_or(args, "default_evidence_required", true)?,
            now_ms: now_ms_i64(),
        };
        let row = self
            .store
            .create_milestone_template(request)
            .map_err(store_error)?;
        Ok(ai_ok(
            "milestone_templates_create",
            json!({ "template": template_json(&row) }),
        ))
    }

    pub(crate) fn tool_milestone_templates_list(&mut self, _args: &Args) -> Result<Value, Value> {
        let templates = self.store.list_milestone_templates().map_err(store_error)?;
        Ok(ai_ok(
            "milestone_templates_list",
            json!({
                "count": templates.len(),
                "templates": templates.iter().map(template_json).collect::<Vec<_>>()
            }),
        ))
    }

    pub(crate) fn tool_milestones_list(&mut self, args: &Args) -> Result<Value, Value> {
        let project_id = optional_string(args, "project_id")?;
        let status = optional_label(
            args,
            "status",
            MilestoneStatus::parse,
            MilestoneStatus::labels,
        )?;
        let today = date_or(args, "as_of", today_utc())?;
        let rows = self
            .store
            .list_milestones(ListMilestonesRequest {
                project_id,
                status,
                today,
            })
            .map_err(store_error)?;

        let overdue = rows.iter().filter(|row| row.is_overdue).count();
        let mut warnings = Vec::new();
        if overdue > 0 {
            warnings.push(warning(
                "MILESTONES_OVERDUE",
                &format!("{overdue} milestone(s) are past their due date"),
                "Follow up with the vendor or move the due date.",
            ));
        }
        Ok(ai_ok_with_warnings(
            "milestones_list",
            json!({
                "as_of": today.to_string(),
                "count": rows.len(),
                "milestones": rows
                    .iter()
                    .map(|row| milestone_progress_json(row, today))
                    .collect::<Vec<_>>()
            }),
            warnings,
            Vec::new(),
        ))
    }

    pub(crate) fn tool_milestones_get(&mut self, args: &Args) -> Result<Value, Value> {
        let milestone_id = require_string(args, "milestone_id")?;
        let today = date_or(args, "as_of", today_utc())?;
        let row = self.store.get_milestone(&milestone_id).map_err(store_error)?;
        let evidence = self.store.list_evidence(&row.id).map_err(store_error)?;
        Ok(ai_ok(
            "milestones_get",
            json!({
                "milestone": milestone_json(&row, today),
                "evidence": evidence.iter().map(evidence_json).collect::<Vec<_>>()
            }),
        ))
    }

    pub(crate) fn tool_milestones_approve(&mut self, args: &Args) -> Result<Value, Value> {
        let request = ApproveMilestoneRequest {
            milestone_id: require_string(args, "milestone_id")?,
            expected_revision: optional_i64(args, "expected_revision")?,
            reviewed_by: optional_string(args, "reviewed_by")?,
            now_ms: now_ms_i64(),
        };
        let row = self.store.approve_milestone(request).map_err(store_error)?;
        Ok(ai_ok(
            "milestones_approve",
            json!({ "milestone": milestone_json(&row, today_utc()) }),
        ))
    }

    pub(crate) fn tool_milestones_reject(&mut self, args: &Args) -> Result<Value, Value> {
        let request = RejectMilestoneRequest {
            milestone_id: require_string(args, "milestone_id")?,
            reason: optional_string(args, "reason")?.unwrap_or_default(),
            expected_revision: optional_i64(args, "expected_revision")?,
            reviewed_by: optional_string(args, "reviewed_by")?,
            now_ms: now_ms_i64(),
        };
        let row = self.store.reject_milestone(request).map_err(store_error)?;
        Ok(ai_ok(
            "milestones_reject",
            json!({ "milestone": milestone_json(&row, today_utc()) }),
        ))
    }

    pub(crate) fn tool_milestones_events(&mut self, args: &Args) -> Result<Value, Value> {
        let milestone_id = require_string(args, "milestone_id")?;
        let events = self
            .store
            .list_milestone_events(&milestone_id)
            .map_err(store_error)?;
        Ok(ai_ok(
            "milestones_events",
            json!({
                "milestone_id": milestone_id.trim(),
                "count": events.len(),
                "events": events.iter().map(event_json).collect::<Vec<_>>()
            }),
        ))
    }

    pub(crate) fn tool_evidence_list(&mut self, args: &Args) -> Result<Value, Value> {
        let milestone_id = require_string(args, "milestone_id")?;
        let evidence = self.store.list_evidence(&milestone_id).map_err(store_error)?;
        Ok(ai_ok(
            "evidence_list",
            json!({
                "milestone_id": milestone_id.trim(),
                "count": evidence.len(),
                "evidence": evidence.iter().map(evidence_json).collect::<Vec<_>>()
            }),
        ))
    }
}
