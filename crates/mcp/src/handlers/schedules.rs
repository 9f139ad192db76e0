#![forbid(unsafe_code)]

use super::render::schedule_json;
use crate::*;
use mt_core::model::{ActivityStatus, ActivityType};
use mt_storage::{CreateScheduleRequest, NewActivity};
use serde_json::{Value, json};

fn parse_activity(item: &Args) -> Result<NewActivity, Value> {
    Ok(NewActivity {
        name: require_string(item, "name")?,
        description: optional_string(item, "description")?,
        activity_type: optional_label(
            item,
            "activity_type",
            ActivityType::parse,
            ActivityType::labels,
        )?
        .unwrap_or(ActivityType::Task),
        start_date: optional_string(item, "start_date")?,
        end_date: optional_string(item, "end_date")?,
        progress_percentage: optional_f64(item, "progress_percentage")?.unwrap_or(0.0),
        status: optional_label(item, "status", ActivityStatus::parse, ActivityStatus::labels)?
            .unwrap_or(ActivityStatus::NotStarted),
    })
}

impl McpServer {
    pub(crate) fn tool_schedules_create(&mut self, args: &Args) -> Result<Value, Value> {
        let activities = optional_object_list(args, "activities")?
            .into_iter()
            .map(parse_activity)
            .collect::<Result<Vec<_>, _>>()?;
        let request = CreateScheduleRequest {
            project_id: require_string(args, "project_id")?,
            name: require_string(args, "name")?,
            description: optional_string(args, "description")?,
            start_date: optional_string(args, "start_date")?,
            end_date: optional_string(args, "end_date")?,
            activities,
            now_ms: now_ms_i64(),
        };
        let row = self.store.create_schedule(request).map_err(store_error)?;
        Ok(ai_ok(
            "schedules_create",
            json!({ "schedule": schedule_json(&row) }),
        ))
    }

    pub(crate) fn tool_schedules_list(&mut self, args: &Args) -> Result<Value, Value> {
        let project_id = require_string(args, "project_id")?;
        let rows = self.store.list_schedules(&project_id).map_err(store_error)?;
        Ok(ai_ok(
            "schedules_list",
            json!({
                "count": rows.len(),
                "schedules": rows.iter().map(schedule_json).collect::<Vec<_>>()
            }),
        ))
    }
}
