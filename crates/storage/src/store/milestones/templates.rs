#![forbid(unsafe_code)]

use super::super::*;
use mt_core::ids::RecordKind;

impl SqliteStore {
    /// Template names are unique regardless of case.
    pub fn create_milestone_template(
        &mut self,
        request: CreateMilestoneTemplateRequest,
    ) -> Result<MilestoneTemplateRow, StoreError> {
        let CreateMilestoneTemplateRequest {
            name,
            description,
            default_weight_percentage,
            default_evidence_required,
            now_ms,
        } = request;
        let name = required_text(&name, "template name must not be empty")?;
        let default_weight_percentage = milestone_weight(
            default_weight_percentage,
            "default_weight_percentage must be greater than 0 and at most 100",
        )?;

        let tx = self.conn.transaction()?;
        let id = next_id_tx(&tx, RecordKind::MilestoneTemplate)?;
        let row = MilestoneTemplateRow {
            id,
            name,
            description: optional_text(description),
            default_weight_percentage,
            default_evidence_required,
            created_at_ms: now_ms,
        };
        let inserted = tx.execute(
            &format!("INSERT INTO milestone_templates({TEMPLATE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
            params![
                &row.id,
                &row.name,
                &row.description,
                row.default_weight_percentage,
                i64::from(row.default_evidence_required),
                now_ms
            ],
        );
        match inserted {
            Err(err) if is_unique_violation(&err) => {
                return Err(StoreError::Conflict("a template with this name already exists"));
            }
            other => {
                other?;
            }
        }
        tx.commit()?;

        tracing::info!(template_id = %row.id, name = %row.name, "milestone template created");
        Ok(row)
    }

    pub fn list_milestone_templates(&self) -> Result<Vec<MilestoneTemplateRow>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM milestone_templates ORDER BY name COLLATE NOCASE, rowid"
        ))?;
        let rows = stmt.query_map([], template_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
