#![forbid(unsafe_code)]

use super::render::{overview_json, project_json, purchase_order_json};
use crate::*;
use mt_core::model::ProjectStatus;
use mt_storage::{
    CreateProjectRequest, CreatePurchaseOrderRequest, ListProjectsRequest,
    SetProjectStatusRequest,
};
use serde_json::{Value, json};

const DEFAULT_LIST_LIMIT: usize = 50;
const MAX_LIST_LIMIT: usize = 200;

impl McpServer {
    pub(crate) fn tool_projects_create(&mut self, args: &Args) -> Result<Value, Value> {
        let request = CreateProjectRequest {
            name: require_string(args, "name")?,
            description: optional_string(args, "description")?,
            client_id: require_string(args, "client_id")?,
            project_manager_id: require_string(args, "project_manager_id")?,
            vendor_id: optional_string(args, "vendor_id")?,
            start_date: optional_string(args, "start_date")?,
            end_date: optional_string(args, "end_date")?,
            budget: optional_f64(args, "budget")?,
            currency: optional_string(args, "currency")?,
            now_ms: now_ms_i64(),
        };
        let row = self.store.create_project(request).map_err(store_error)?;
        Ok(ai_ok("projects_create", json!({ "project": project_json(&row) })))
    }

    /// Newest first. With progress (the default) every project carries its
    /// weighted rollup; without it the plain rows are paged in SQL.
    pub(crate) fn tool_projects_list(&mut self, args: &Args) -> Result<Value, Value> {
        let status = optional_label(args, "status", ProjectStatus::parse, ProjectStatus::labels)?;
        let include_progress = flag_or(args, "include_progress", true)?;
        let limit = optional_usize(args, "limit")?
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);
        let offset = optional_usize(args, "offset")?.unwrap_or(0);

        let projects = if include_progress {
            let today = date_or(args, "as_of", today_utc())?;
            self.store
                .list_project_overviews(status, today)
                .map_err(store_error)?
                .iter()
                .skip(offset)
                .take(limit)
                .map(overview_json)
                .collect::<Vec<_>>()
        } else {
            self.store
                .list_projects(ListProjectsRequest {
                    status,
                    limit,
                    offset,
                })
                .map_err(store_error)?
                .iter()
                .map(project_json)
                .collect::<Vec<_>>()
        };

        Ok(ai_ok(
            "projects_list",
            json!({
                "count": projects.len(),
                "limit": limit,
                "offset": offset,
                "projects": projects
            }),
        ))
    }

    pub(crate) fn tool_projects_get(&mut self, args: &Args) -> Result<Value, Value> {
        let project_id = require_string(args, "project_id")?;
        let today = date_or(args, "as_of", today_utc())?;
        let overview = self
            .store
            .project_overview(&project_id, today)
            .map_err(store_error)?;
        let purchase_orders = self
            .store
            .list_purchase_orders(Some(&overview.project.id))
            .map_err(store_error)?;

        let mut result = overview_json(&overview);
        if let Some(obj) = result.as_object_mut() {
            obj.insert(
                "purchase_order_list".to_string(),
                Value::Array(purchase_orders.iter().map(purchase_order_json).collect()),
            );
            obj.insert("as_of".to_string(), Value::String(today.to_string()));
        }
        Ok(ai_ok("projects_get", result))
    }

    pub(crate) fn tool_projects_set_status(&mut self, args: &Args) -> Result<Value, Value> {
        let request = SetProjectStatusRequest {
            project_id: require_string(args, "project_id")?,
            status: require_label(args, "status", ProjectStatus::parse, ProjectStatus::labels)?,
            expected_revision: optional_i64(args, "expected_revision")?,
            now_ms: now_ms_i64(),
        };
        let row = self
            .store
            .set_project_status(request)
            .map_err(store_error)?;
        Ok(ai_ok(
            "projects_set_status",
            json!({ "project": project_json(&row) }),
        ))
    }

    pub(crate) fn tool_purchase_orders_create(&mut self, args: &Args) -> Result<Value, Value> {
        let request = CreatePurchaseOrderRequest {
            po_number: require_string(args, "po_number")?,
            project_id: require_string(args, "project_id")?,
            vendor_id: require_string(args, "vendor_id")?,
            title: require_string(args, "title")?,
            description: optional_string(args, "description")?,
            total_amount: require_f64(args, "total_amount")?,
            currency: optional_string(args, "currency")?,
            issue_date: optional_string(args, "issue_date")?,
            expected_delivery_date: optional_string(args, "expected_delivery_date")?,
            now_ms: now_ms_i64(),
        };
        let row = self
            .store
            .create_purchase_order(request)
            .map_err(store_error)?;
        Ok(ai_ok(
            "purchase_orders_create",
            json!({ "purchase_order": purchase_order_json(&row) }),
        ))
    }

    pub(crate) fn tool_purchase_orders_list(&mut self, args: &Args) -> Result<Value, Value> {
        let project_id = optional_string(args, "project_id")?;
        let rows = self
            .store
            .list_purchase_orders(project_id.as_deref())
            .map_err(store_error)?;
        Ok(ai_ok(
            "purchase_orders_list",
            json!({
                "count": rows.len(),
                "purchase_orders": rows.iter().map(purchase_order_json).collect::<Vec<_>>()
            }),
        ))
    }
}
