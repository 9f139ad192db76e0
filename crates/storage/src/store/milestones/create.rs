#![forbid(unsafe_code)]

use super::super::projects::project_record_id;
use super::super::*;
use super::template_record_id;
use mt_core::ids::RecordKind;
use mt_core::model::{MilestoneStatus, ProjectStatus};
use mt_core::progress::fits_weight_budget;

impl SqliteStore {
    /// Creates a `pending` milestone. Blank fields fall back to the template's
    /// defaults when a template is given. The project's weights may not sum
    /// past 100, and the first milestone moves a `planning` project to
    /// `active`.
    pub fn create_milestone(
        &mut self,
        request: CreateMilestoneRequest,
    ) -> Result<MilestoneRow, StoreError> {
        let CreateMilestoneRequest {
            project_id,
            purchase_order_id,
            template_id,
            name,
            description,
            weight_percentage,
            due_date,
            evidence_required,
            now_ms,
        } = request;

        let project_id = project_record_id(&project_id)?;
        let purchase_order_id = optional_record_id(
            RecordKind::PurchaseOrder,
            purchase_order_id.as_deref(),
            "purchase_order_id must look like PO-<number>",
        )?;
        let template = match template_id.as_deref().map(template_record_id).transpose()? {
            Some(id) => Some(load_template(&self.conn, &id)?),
            None => None,
        };
        let name = match (name.trim(), &template) {
            ("", Some(template)) => template.name.clone(),
            (name, _) => required_text(name, "milestone name must not be empty")?,
        };
        let description = optional_text(description)
            .or_else(|| template.as_ref().and_then(|t| t.description.clone()));
        let weight_percentage = weight_percentage
            .or_else(|| template.as_ref().map(|t| t.default_weight_percentage))
            .ok_or(StoreError::InvalidInput(
                "weight_percentage is required without a template",
            ))?;
        let weight_percentage = milestone_weight(
            weight_percentage,
            "weight_percentage must be greater than 0 and at most 100",
        )?;
        let evidence_required = evidence_required
            .or_else(|| template.as_ref().map(|t| t.default_evidence_required))
            .unwrap_or(true);
        let due_date = optional_date(due_date.as_deref(), "due_date must be YYYY-MM-DD")?;

        let tx = self.conn.transaction()?;
        let project = load_project(&tx, &project_id)?;
        if let Some(po_id) = purchase_order_id.as_deref() {
            let po = load_purchase_order(&tx, po_id)?;
            if po.project_id != project.id {
                return Err(StoreError::InvalidInput(
                    "purchase order belongs to a different project",
                ));
            }
        }

        let (allocated, existing): (f64, i64) = tx.query_row(
            "SELECT COALESCE(SUM(weight_percentage), 0), COUNT(*) FROM milestones WHERE project_id=?1",
            params![&project.id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        if !fits_weight_budget(allocated, weight_percentage) {
            return Err(StoreError::WeightBudgetExceeded {
                allocated,
                requested: weight_percentage,
            });
        }

        let id = next_id_tx(&tx, RecordKind::Milestone)?;
        let row = MilestoneRow {
            id,
            project_id: project.id.clone(),
            purchase_order_id,
            name,
            description,
            weight_percentage,
            completion_percentage: 0.0,
            status: MilestoneStatus::Pending,
            due_date,
            completed_date: None,
            vendor_notes: None,
            rejection_reason: None,
            evidence_required,
            revision: 0,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
            template_id: template.map(|t| t.id),
        };
        tx.execute(
            &format!(
                "INSERT INTO milestones({MILESTONE_COLUMNS}) VALUES ({})",
                placeholders(MILESTONE_COLUMN_COUNT)
            ),
            params![
                &row.id,
                &row.project_id,
                &row.purchase_order_id,
                &row.name,
                &row.description,
                row.weight_percentage,
                row.completion_percentage,
                row.status.as_str(),
                row.due_date.map(|d| d.to_string()),
                Option::<String>::None,
                Option::<String>::None,
                Option::<String>::None,
                i64::from(row.evidence_required),
                row.revision,
                now_ms,
                now_ms,
                &row.template_id
            ],
        )?;
        emit_milestone_event_tx(
            &tx,
            MilestoneEventArgs {
                milestone_id: &row.id,
                now_ms,
                event_type: "milestone_created",
                actor: None,
                payload: serde_json::json!({
                    "project_id": row.project_id,
                    "weight_percentage": row.weight_percentage,
                    "template_id": row.template_id,
                }),
            },
        )?;

        if existing == 0 && project.status == ProjectStatus::Planning {
            tx.execute(
                "UPDATE projects SET status=?2, revision=revision+1, updated_at_ms=?3 WHERE id=?1",
                params![&project.id, ProjectStatus::Active.as_str(), now_ms],
            )?;
            tracing::info!(project_id = %project.id, "first milestone activated project");
        }

        tx.commit()?;
        Ok(row)
    }
}

fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}
