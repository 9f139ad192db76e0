#![forbid(unsafe_code)]

use super::*;
use mt_core::dates::CalendarDate;
use mt_core::ids::RecordKind;
use mt_core::model::ProjectStatus;
use mt_core::progress::{MilestoneSnapshot, compute_project_progress};

impl SqliteStore {
    pub fn create_project(
        &mut self,
        request: CreateProjectRequest,
    ) -> Result<ProjectRow, StoreError> {
        let CreateProjectRequest {
            name,
            description,
            client_id,
            project_manager_id,
            vendor_id,
            start_date,
            end_date,
            budget,
            currency: requested_currency,
            now_ms,
        } = request;

        let name = required_text(&name, "project name must not be empty")?;
        let client_id = record_id(
            RecordKind::Organization,
            &client_id,
            "client_id must look like ORG-<number>",
        )?;
        let project_manager_id = record_id(
            RecordKind::User,
            &project_manager_id,
            "project_manager_id must look like USR-<number>",
        )?;
        let vendor_id = optional_record_id(
            RecordKind::Organization,
            vendor_id.as_deref(),
            "vendor_id must look like ORG-<number>",
        )?;
        let start_date = optional_date(start_date.as_deref(), "start_date must be YYYY-MM-DD")?;
        let end_date = optional_date(end_date.as_deref(), "end_date must be YYYY-MM-DD")?;
        if let (Some(start), Some(end)) = (start_date, end_date)
            && end <= start
        {
            return Err(StoreError::InvalidInput(
                "end_date must be after start_date",
            ));
        }
        let budget = budget
            .map(|value| amount(value, "budget must be a non-negative number"))
            .transpose()?;
        let currency = currency(requested_currency)?;

        let tx = self.conn.transaction()?;
        load_organization(&tx, &client_id)?;
        if let Some(vendor_id) = vendor_id.as_deref() {
            load_organization(&tx, vendor_id)?;
        }
        let manager = load_user(&tx, &project_manager_id)?;
        if !manager.role.can_review() {
            return Err(StoreError::InvalidInput(
                "project manager must have role admin or project_manager",
            ));
        }

        let id = next_id_tx(&tx, RecordKind::Project)?;
        let row = ProjectRow {
            id,
            name,
            description: optional_text(description),
            client_id,
            project_manager_id,
            vendor_id,
            status: ProjectStatus::Planning,
            start_date,
            end_date,
            budget,
            currency,
            revision: 0,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        };
        tx.execute(
            r#"
            INSERT INTO projects(id, name, description, client_id, project_manager_id, vendor_id,
                                 status, start_date, end_date, budget, currency, revision,
                                 created_at_ms, updated_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 0, ?12, ?12)
            "#,
            params![
                &row.id,
                &row.name,
                &row.description,
                &row.client_id,
                &row.project_manager_id,
                &row.vendor_id,
                row.status.as_str(),
                row.start_date.map(|d| d.to_string()),
                row.end_date.map(|d| d.to_string()),
                row.budget,
                &row.currency,
                now_ms
            ],
        )?;
        tx.commit()?;

        tracing::info!(project_id = %row.id, "project created");
        Ok(row)
    }

    pub fn list_projects(
        &self,
        request: ListProjectsRequest,
    ) -> Result<Vec<ProjectRow>, StoreError> {
        let limit = to_sqlite_i64(request.limit)?;
        let offset = to_sqlite_i64(request.offset)?;
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {PROJECT_COLUMNS} FROM projects
            WHERE ?1 IS NULL OR status = ?1
            ORDER BY created_at_ms DESC, rowid DESC
            LIMIT ?2 OFFSET ?3
            "#
        ))?;
        let rows = stmt.query_map(
            params![request.status.map(|s| s.as_str()), limit, offset],
            project_from_row,
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn get_project(&self, project_id: &str) -> Result<ProjectRow, StoreError> {
        let project_id = project_record_id(project_id)?;
        load_project(&self.conn, &project_id)
    }

    pub fn set_project_status(
        &mut self,
        request: SetProjectStatusRequest,
    ) -> Result<ProjectRow, StoreError> {
        let SetProjectStatusRequest {
            project_id,
            status,
            expected_revision,
            now_ms,
        } = request;
        let project_id = project_record_id(&project_id)?;

        let tx = self.conn.transaction()?;
        let current = load_project(&tx, &project_id)?;
        check_revision(expected_revision, current.revision)?;

        let row = ProjectRow {
            status,
            revision: current.revision + 1,
            updated_at_ms: now_ms,
            ..current
        };
        tx.execute(
            "UPDATE projects SET status=?2, revision=?3, updated_at_ms=?4 WHERE id=?1",
            params![&row.id, row.status.as_str(), row.revision, now_ms],
        )?;
        tx.commit()?;

        tracing::info!(project_id = %row.id, status = %row.status, "project status changed");
        Ok(row)
    }

    /// Rollup for one project: weighted completion plus overdue/review counts.
    pub fn project_overview(
        &self,
        project_id: &str,
        today: CalendarDate,
    ) -> Result<ProjectOverview, StoreError> {
        let project_id = project_record_id(project_id)?;
        let project = load_project(&self.conn, &project_id)?;
        self.overview_for(project, today)
    }

    pub fn list_project_overviews(
        &self,
        status: Option<ProjectStatus>,
        today: CalendarDate,
    ) -> Result<Vec<ProjectOverview>, StoreError> {
        let projects = self.list_projects(ListProjectsRequest {
            status,
            limit: u32::MAX as usize,
            offset: 0,
        })?;
        projects
            .into_iter()
            .map(|project| self.overview_for(project, today))
            .collect()
    }

    fn overview_for(
        &self,
        project: ProjectRow,
        today: CalendarDate,
    ) -> Result<ProjectOverview, StoreError> {
        let snapshots = load_project_milestones(&self.conn, &project.id)?
            .iter()
            .map(MilestoneRow::snapshot)
            .collect::<Vec<MilestoneSnapshot>>();
        let rollup = compute_project_progress(&snapshots, today);

        let client_name = load_organization(&self.conn, &project.client_id)?.name;
        let vendor_name = match project.vendor_id.as_deref() {
            Some(vendor_id) => Some(load_organization(&self.conn, vendor_id)?.name),
            None => None,
        };
        let manager_name = load_user(&self.conn, &project.project_manager_id)?.full_name();
        let purchase_orders: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM purchase_orders WHERE project_id=?1",
            params![&project.id],
            |row| row.get(0),
        )?;

        Ok(ProjectOverview {
            project,
            client_name,
            vendor_name,
            manager_name,
            purchase_orders: usize::try_from(purchase_orders).unwrap_or_default(),
            rollup,
        })
    }
}

pub(super) fn project_record_id(value: &str) -> Result<String, StoreError> {
    record_id(
        RecordKind::Project,
        value,
        "project_id must look like PRJ-<number>",
    )
}
