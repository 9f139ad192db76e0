#![forbid(unsafe_code)]

use mt_core::dates::CalendarDate;
use mt_core::model::{ActivityStatus, ActivityType, ScheduleStatus};

#[derive(Clone, Debug)]
pub struct NewActivity {
    pub name: String,
    pub description: Option<String>,
    pub activity_type: ActivityType,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub progress_percentage: f64,
    pub status: ActivityStatus,
}

#[derive(Clone, Debug)]
pub struct CreateScheduleRequest {
    pub project_id: String,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub activities: Vec<NewActivity>,
    pub now_ms: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActivityRow {
    pub id: String,
    pub schedule_id: String,
    pub name: String,
    pub description: Option<String>,
    pub activity_type: ActivityType,
    pub start_date: Option<CalendarDate>,
    pub end_date: Option<CalendarDate>,
    pub duration_days: Option<i64>,
    pub progress_percentage: f64,
    pub status: ActivityStatus,
    pub ordinal: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleRow {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<CalendarDate>,
    pub end_date: Option<CalendarDate>,
    pub status: ScheduleStatus,
    pub created_at_ms: i64,
    pub activities: Vec<ActivityRow>,
}
