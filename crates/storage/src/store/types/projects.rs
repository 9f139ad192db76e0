#![forbid(unsafe_code)]

use mt_core::dates::CalendarDate;
use mt_core::model::{ProjectStatus, PurchaseOrderStatus};
use mt_core::progress::ProjectRollup;

#[derive(Clone, Debug)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
    pub client_id: String,
    pub project_manager_id: String,
    pub vendor_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub budget: Option<f64>,
    pub currency: Option<String>,
    pub now_ms: i64,
}

#[derive(Clone, Debug)]
pub struct ListProjectsRequest {
    pub status: Option<ProjectStatus>,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Clone, Debug)]
pub struct SetProjectStatusRequest {
    pub project_id: String,
    pub status: ProjectStatus,
    pub expected_revision: Option<i64>,
    pub now_ms: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub client_id: String,
    pub project_manager_id: String,
    pub vendor_id: Option<String>,
    pub status: ProjectStatus,
    pub start_date: Option<CalendarDate>,
    pub end_date: Option<CalendarDate>,
    pub budget: Option<f64>,
    pub currency: String,
    pub revision: i64,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// A project with the figures a dashboard card needs.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectOverview {
    pub project: ProjectRow,
    pub client_name: String,
    pub vendor_name: Option<String>,
    pub manager_name: String,
    pub purchase_orders: usize,
    pub rollup: ProjectRollup,
}

#[derive(Clone, Debug)]
pub struct CreatePurchaseOrderRequest {
    pub po_number: String,
    pub project_id: String,
    pub vendor_id: String,
    pub title: String,
    pub description: Option<String>,
    pub total_amount: f64,
    pub currency: Option<String>,
    pub issue_date: Option<String>,
    pub expected_delivery_date: Option<String>,
    pub now_ms: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PurchaseOrderRow {
    pub id: String,
    pub po_number: String,
    pub project_id: String,
    pub vendor_id: String,
    pub title: String,
    pub description: Option<String>,
    pub total_amount: f64,
    pub currency: String,
    pub status: PurchaseOrderStatus,
    pub issue_date: Option<CalendarDate>,
    pub expected_delivery_date: Option<CalendarDate>,
    pub created_at_ms: i64,
}
