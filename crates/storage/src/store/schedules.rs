#![forbid(unsafe_code)]

use super::projects::project_record_id;
use super::*;
use mt_core::dates::CalendarDate;
use mt_core::ids::RecordKind;
use mt_core::lifecycle::validate_percentage;
use mt_core::model::{ActivityStatus, ActivityType, ScheduleStatus};
use rusqlite::Transaction;

impl SqliteStore {
    /// Creates a `draft` schedule with its activities in one transaction.
    pub fn create_schedule(
        &mut self,
        request: CreateScheduleRequest,
    ) -> Result<ScheduleRow, StoreError> {
        let CreateScheduleRequest {
            project_id,
            name,
            description,
            start_date,
            end_date,
            activities,
            now_ms,
        } = request;

        let project_id = project_record_id(&project_id)?;
        let name = required_text(&name, "schedule name must not be empty")?;
        let start_date = optional_date(start_date.as_deref(), "start_date must be YYYY-MM-DD")?;
        let end_date = optional_date(end_date.as_deref(), "end_date must be YYYY-MM-DD")?;
        ensure_ordered(start_date, end_date)?;

        let tx = self.conn.transaction()?;
        load_project(&tx, &project_id)?;

        let id = next_id_tx(&tx, RecordKind::Schedule)?;
        let mut schedule = ScheduleRow {
            id,
            project_id,
            name,
            description: optional_text(description),
            start_date,
            end_date,
            status: ScheduleStatus::Draft,
            created_at_ms: now_ms,
            activities: Vec::with_capacity(activities.len()),
        };
        tx.execute(
            r#"
            INSERT INTO project_schedules(id, project_id, name, description, start_date, end_date,
                                          status, created_at_ms, updated_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            "#,
            params![
                &schedule.id,
                &schedule.project_id,
                &schedule.name,
                &schedule.description,
                schedule.start_date.map(|d| d.to_string()),
                schedule.end_date.map(|d| d.to_string()),
                schedule.status.as_str(),
                now_ms
            ],
        )?;

        for (ordinal, activity) in (1i64..).zip(activities) {
            let row = activity_row(&tx, &schedule.id, ordinal, activity)?;
            tx.execute(
                r#"
                INSERT INTO schedule_activities(id, schedule_id, ordinal, name, description,
                                                activity_type, start_date, end_date, duration_days,
                                                progress_percentage, status)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
                params![
                    &row.id,
                    &row.schedule_id,
                    row.ordinal,
                    &row.name,
                    &row.description,
                    row.activity_type.as_str(),
                    row.start_date.map(|d| d.to_string()),
                    row.end_date.map(|d| d.to_string()),
                    row.duration_days,
                    row.progress_percentage,
                    row.status.as_str()
                ],
            )?;
            schedule.activities.push(row);
        }

        tx.commit()?;
        Ok(schedule)
    }

    pub fn list_schedules(&self, project_id: &str) -> Result<Vec<ScheduleRow>, StoreError> {
        let project_id = project_record_id(project_id)?;
        load_project(&self.conn, &project_id)?;

        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, project_id, name, description, start_date, end_date, status, created_at_ms
            FROM project_schedules WHERE project_id=?1 ORDER BY rowid
            "#,
        )?;
        let rows = stmt.query_map(params![&project_id], |row| {
            Ok(ScheduleRow {
                id: row.get(0)?,
                project_id: row.get(1)?,
                name: row.get(2)?,
                description: row.get(3)?,
                start_date: date_column(row, 4)?,
                end_date: date_column(row, 5)?,
                status: enum_column(row, 6, ScheduleStatus::parse)?,
                created_at_ms: row.get(7)?,
                activities: Vec::new(),
            })
        })?;
        let mut schedules = rows.collect::<Result<Vec<_>, _>>()?;

        let mut activities = self.conn.prepare(
            r#"
            SELECT id, schedule_id, ordinal, name, description, activity_type, start_date,
                   end_date, duration_days, progress_percentage, status
            FROM schedule_activities WHERE schedule_id=?1 ORDER BY ordinal
            "#,
        )?;
        for schedule in &mut schedules {
            let rows = activities.query_map(params![&schedule.id], |row| {
                Ok(ActivityRow {
                    id: row.get(0)?,
                    schedule_id: row.get(1)?,
                    ordinal: row.get(2)?,
                    name: row.get(3)?,
                    description: row.get(4)?,
                    activity_type: enum_column(row, 5, ActivityType::parse)?,
                    start_date: date_column(row, 6)?,
                    end_date: date_column(row, 7)?,
                    duration_days: row.get(8)?,
                    progress_percentage: row.get(9)?,
                    status: enum_column(row, 10, ActivityStatus::parse)?,
                })
            })?;
            schedule.activities = rows.collect::<Result<Vec<_>, _>>()?;
        }
        Ok(schedules)
    }
}

fn activity_row(
    tx: &Transaction<'_>,
    schedule_id: &str,
    ordinal: i64,
    activity: NewActivity,
) -> Result<ActivityRow, StoreError> {
    let name = required_text(&activity.name, "activity name must not be empty")?;
    let start_date = optional_date(
        activity.start_date.as_deref(),
        "activity start_date must be YYYY-MM-DD",
    )?;
    let end_date = optional_date(
        activity.end_date.as_deref(),
        "activity end_date must be YYYY-MM-DD",
    )?;
    ensure_ordered(start_date, end_date)?;
    let progress_percentage = validate_percentage(activity.progress_percentage)
        .map_err(|_| StoreError::InvalidInput("activity progress must be between 0 and 100"))?;

    // Durations count both ends: a one-day activity starts and ends on the same date.
    let duration_days = match (start_date, end_date) {
        (Some(start), Some(end)) => Some(start.days_until(end) + 1),
        _ => None,
    };
    let status = if progress_percentage >= 100.0 {
        ActivityStatus::Completed
    } else {
        activity.status
    };

    Ok(ActivityRow {
        id: next_id_tx(tx, RecordKind::Activity)?,
        schedule_id: schedule_id.to_string(),
        name,
        description: optional_text(activity.description),
        activity_type: activity.activity_type,
        start_date,
        end_date,
        duration_days,
        progress_percentage,
        status,
        ordinal,
    })
}

fn ensure_ordered(
    start: Option<CalendarDate>,
    end: Option<CalendarDate>,
) -> Result<(), StoreError> {
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        return Err(StoreError::InvalidInput(
            "end_date must not be before start_date",
        ));
    }
    Ok(())
}
