#![forbid(unsafe_code)]

use super::super::projects::project_record_id;
use super::super::*;
use super::milestone_record_id;

impl SqliteStore {
    pub fn get_milestone(&self, milestone_id: &str) -> Result<MilestoneRow, StoreError> {
        let milestone_id = milestone_record_id(milestone_id)?;
        load_milestone(&self.conn, &milestone_id)
    }

    /// Milestones with project name, PO number, evidence count and derived
    /// overdue flag, ordered by due date (undated last). A status filter
    /// matches the stored status or the displayed one, so a late submission
    /// stays in the `pending_completion_review` queue and `overdue` still
    /// selects late work.
    pub fn list_milestones(
        &self,
        request: ListMilestonesRequest,
    ) -> Result<Vec<MilestoneProgressRow>, StoreError> {
        let ListMilestonesRequest {
            project_id,
            status,
            today,
        } = request;
        let project_id = project_id.as_deref().map(project_record_id).transpose()?;

        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {}, p.name, po.po_number,
                   (SELECT COUNT(*) FROM evidence e WHERE e.milestone_id = m.id)
            FROM milestones m
            JOIN projects p ON p.id = m.project_id
            LEFT JOIN purchase_orders po ON po.id = m.purchase_order_id
            WHERE ?1 IS NULL OR m.project_id = ?1
            ORDER BY m.due_date IS NULL, m.due_date, m.rowid
            "#,
            qualified(MILESTONE_COLUMNS, "m")
        ))?;
        let rows = stmt.query_map(params![project_id], |row| {
            let milestone = milestone_from_row(row)?;
            let project_name: String = row.get(MILESTONE_COLUMN_COUNT)?;
            let po_number: Option<String> = row.get(MILESTONE_COLUMN_COUNT + 1)?;
            let evidence_count: i64 = row.get(MILESTONE_COLUMN_COUNT + 2)?;
            Ok((milestone, project_name, po_number, evidence_count))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (milestone, project_name, po_number, evidence_count) = row?;
            let display_status = milestone.display_status(today);
            if status.is_some_and(|wanted| wanted != milestone.status && wanted != display_status) {
                continue;
            }
            out.push(MilestoneProgressRow {
                is_overdue: milestone.is_overdue(today),
                display_status,
                project_name,
                po_number,
                evidence_count: usize::try_from(evidence_count).unwrap_or_default(),
                milestone,
            });
        }
        Ok(out)
    }

    pub fn list_milestone_events(
        &self,
        milestone_id: &str,
    ) -> Result<Vec<MilestoneEventRow>, StoreError> {
        let milestone_id = milestone_record_id(milestone_id)?;
        load_milestone(&self.conn, &milestone_id)?;
        let mut stmt = self.conn.prepare(
            r#"
            SELECT seq, milestone_id, ts_ms, event_type, actor, payload_json
            FROM milestone_events WHERE milestone_id=?1 ORDER BY seq
            "#,
        )?;
        let rows = stmt.query_map(params![&milestone_id], |row| {
            Ok(MilestoneEventRow {
                seq: row.get(0)?,
                milestone_id: row.get(1)?,
                ts_ms: row.get(2)?,
                event_type: row.get(3)?,
                actor: row.get(4)?,
                payload_json: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
