#![forbid(unsafe_code)]

use crate::{McpServer, ai_error, args_object};
use serde_json::Value;

macro_rules! define_dispatch {
    ($($tool_name:literal => $method:ident),* $(,)?) => {
        /// Routes a tool call. `None` means the tool does not exist.
        pub(crate) fn dispatch_tool(server: &mut McpServer, name: &str, args: Value) -> Option<Value> {
            let handler: fn(&mut McpServer, &crate::Args) -> Result<Value, Value> = match name {
                $($tool_name => McpServer::$method,)*
                _ => return None,
            };
            let resp = match args_object(&args) {
                Ok(args) => handler(server, args),
                Err(resp) => Err(resp),
            };
            Some(resp.unwrap_or_else(|err| err))
        }

        #[cfg(test)]
        pub(crate) fn dispatch_tool_names() -> &'static [&'static str] {
            &[$($tool_name),*]
        }
    };
}

define_dispatch! {
    "organizations_create" => tool_organizations_create,
    "organizations_list" => tool_organizations_list,
    "users_create" => tool_users_create,
    "projects_create" => tool_projects_create,
    "projects_list" => tool_projects_list,
    "projects_get" => tool_projects_get,
    "projects_set_status" => tool_projects_set_status,
    "purchase_orders_create" => tool_purchase_orders_create,
    "purchase_orders_list" => tool_purchase_orders_list,
    "milestone_templates_create" => tool_milestone_templates_create,
    "milestone_templates_list" => tool_milestone_templates_list,
    "milestones_create" => tool_milestones_create,
    "milestones_list" => tool_milestones_list,
    "milestones_get" => tool_milestones_get,
    "milestones_approve" => tool_milestones_approve,
    "milestones_reject" => tool_milestones_reject,
    "milestones_events" => tool_milestones_events,
    "evidence_list" => tool_evidence_list,
    "schedules_create" => tool_schedules_create,
    "schedules_list" => tool_schedules_list,
    "analytics_summary" => tool_analytics_summary,
    "analytics_vendors" => tool_analytics_vendors,
    "portal_issue" => tool_portal_issue,
    "portal_revoke" => tool_portal_revoke,
    "portal_tokens" => tool_portal_tokens,
    "portal_open" => tool_portal_open,
    "portal_notes" => tool_portal_notes,
    "portal_progress" => tool_portal_progress,
    "portal_submit" => tool_portal_submit,
}

pub(crate) fn unknown_tool(name: &str) -> Value {
    ai_error("UNKNOWN_TOOL", &format!("Unknown tool: {name}"))
}
