#![forbid(unsafe_code)]

use super::super::*;
use crate::bucket::EvidenceBucket;
use mt_core::dates::CalendarDate;
use mt_core::model::{
    MilestoneStatus, OrganizationType, ProjectStatus, PurchaseOrderStatus, UserRole,
};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub(in crate::store) const ORGANIZATION_COLUMNS: &str = "id, name, org_type, country, address, contact_email, contact_phone, tax_id, created_at_ms";
pub(in crate::store) const USER_COLUMNS: &str =
    "id, email, first_name, last_name, role, organization_id, is_active, created_at_ms";
pub(in crate::store) const PROJECT_COLUMNS: &str = "id, name, description, client_id, project_manager_id, vendor_id, status, start_date, end_date, budget, currency, revision, created_at_ms, updated_at_ms";
pub(in crate::store) const PURCHASE_ORDER_COLUMNS: &str = "id, po_number, project_id, vendor_id, title, description, total_amount, currency, status, issue_date, expected_delivery_date, created_at_ms";
pub(in crate::store) const MILESTONE_COLUMNS: &str = "id, project_id, purchase_order_id, name, description, weight_percentage, completion_percentage, status, due_date, completed_date, vendor_notes, rejection_reason, evidence_required, revision, created_at_ms, updated_at_ms, template_id";
pub(in crate::store) const MILESTONE_COLUMN_COUNT: usize = 17;
pub(in crate::store) const TEMPLATE_COLUMNS: &str = "id, name, description, default_weight_percentage, default_evidence_required, created_at_ms";
pub(in crate::store) const EVIDENCE_COLUMNS: &str = "id, milestone_id, file_name, file_path, mime_type, file_size, description, uploaded_by, uploaded_at_ms";

/// `"a, b"` with alias `m` becomes `"m.a, m.b"`.
pub(in crate::store) fn qualified(columns: &str, alias: &str) -> String {
    columns
        .split(", ")
        .map(|column| format!("{alias}.{column}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(in crate::store) fn enum_column<T>(
    row: &Row<'_>,
    idx: usize,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unexpected stored value {raw:?}").into(),
        )
    })
}

pub(in crate::store) fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<CalendarDate>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|value| {
        CalendarDate::parse(&value).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
        })
    })
    .transpose()
}

pub(in crate::store) fn organization_from_row(row: &Row<'_>) -> rusqlite::Result<OrganizationRow> {
    Ok(OrganizationRow {
        id: row.get(0)?,
        name: row.get(1)?,
        org_type: enum_column(row, 2, OrganizationType::parse)?,
        country: row.get(3)?,
        address: row.get(4)?,
        contact_email: row.get(5)?,
        contact_phone: row.get(6)?,
        tax_id: row.get(7)?,
        created_at_ms: row.get(8)?,
    })
}

pub(in crate::store) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        role: enum_column(row, 4, UserRole::parse)?,
        organization_id: row.get(5)?,
        is_active: row.get::<_, i64>(6)? != 0,
        created_at_ms: row.get(7)?,
    })
}

pub(in crate::store) fn project_from_row(row: &Row<'_>) -> rusqlite::Result<ProjectRow> {
    Ok(ProjectRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        client_id: row.get(3)?,
        project_manager_id: row.get(4)?,
        vendor_id: row.get(5)?,
        status: enum_column(row, 6, ProjectStatus::parse)?,
        start_date: date_column(row, 7)?,
        end_date: date_column(row, 8)?,
        budget: row.get(9)?,
        currency: row.get(10)?,
        revision: row.get(11)?,
        created_at_ms: row.get(12)?,
        updated_at_ms: row.get(13)?,
    })
}

pub(in crate::store) fn purchase_order_from_row(
    row: &Row<'_>,
) -> rusqlite::Result<PurchaseOrderRow> {
    Ok(PurchaseOrderRow {
        id: row.get(0)?,
        po_number: row.get(1)?,
        project_id: row.get(2)?,
        vendor_id: row.get(3)?,
        title: row.get(4)?,
        description: row.get(5)?,
        total_amount: row.get(6)?,
        currency: row.get(7)?,
        status: enum_column(row, 8, PurchaseOrderStatus::parse)?,
        issue_date: date_column(row, 9)?,
        expected_delivery_date: date_column(row, 10)?,
        created_at_ms: row.get(11)?,
    })
}

pub(in crate::store) fn milestone_from_row(row: &Row<'_>) -> rusqlite::Result<MilestoneRow> {
    Ok(MilestoneRow {
        id: row.get(0)?,
        project_id: row.get(1)?,
        purchase_order_id: row.get(2)?,
        name: row.get(3)?,
        description: row.get(4)?,
        weight_percentage: row.get(5)?,
        completion_percentage: row.get(6)?,
        status: enum_column(row, 7, MilestoneStatus::parse)?,
        due_date: date_column(row, 8)?,
        completed_date: date_column(row, 9)?,
        vendor_notes: row.get(10)?,
        rejection_reason: row.get(11)?,
        evidence_required: row.get::<_, i64>(12)? != 0,
        revision: row.get(13)?,
        created_at_ms: row.get(14)?,
        updated_at_ms: row.get(15)?,
        template_id: row.get(16)?,
    })
}

pub(in crate::store) fn template_from_row(
    row: &Row<'_>,
) -> rusqlite::Result<MilestoneTemplateRow> {
    Ok(MilestoneTemplateRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        default_weight_percentage: row.get(3)?,
        default_evidence_required: row.get::<_, i64>(4)? != 0,
        created_at_ms: row.get(5)?,
    })
}

pub(in crate::store) fn evidence_from_row(
    row: &Row<'_>,
    bucket: &dyn EvidenceBucket,
) -> rusqlite::Result<EvidenceRow> {
    let file_path: String = row.get(3)?;
    Ok(EvidenceRow {
        id: row.get(0)?,
        milestone_id: row.get(1)?,
        file_name: row.get(2)?,
        public_url: bucket.public_url(&file_path),
        file_path,
        mime_type: row.get(4)?,
        file_size: row.get(5)?,
        description: row.get(6)?,
        uploaded_by: row.get(7)?,
        uploaded_at_ms: row.get(8)?,
    })
}

pub(in crate::store) fn load_organization(
    conn: &Connection,
    id: &str,
) -> Result<OrganizationRow, StoreError> {
    conn.query_row(
        &format!("SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE id=?1"),
        params![id],
        organization_from_row,
    )
    .optional()?
    .ok_or(StoreError::UnknownId("organization"))
}

pub(in crate::store) fn load_user(conn: &Connection, id: &str) -> Result<UserRow, StoreError> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id=?1"),
        params![id],
        user_from_row,
    )
    .optional()?
    .ok_or(StoreError::UnknownId("user"))
}

pub(in crate::store) fn load_project(conn: &Connection, id: &str) -> Result<ProjectRow, StoreError> {
    conn.query_row(
        &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id=?1"),
        params![id],
        project_from_row,
    )
    .optional()?
    .ok_or(StoreError::UnknownId("project"))
}

pub(in crate::store) fn load_purchase_order(
    conn: &Connection,
    id: &str,
) -> Result<PurchaseOrderRow, StoreError> {
    conn.query_row(
        &format!("SELECT {PURCHASE_ORDER_COLUMNS} FROM purchase_orders WHERE id=?1"),
        params![id],
        purchase_order_from_row,
    )
    .optional()?
    .ok_or(StoreError::UnknownId("purchase order"))
}

pub(in crate::store) fn load_milestone(
    conn: &Connection,
    id: &str,
) -> Result<MilestoneRow, StoreError> {
    conn.query_row(
        &format!("SELECT {MILESTONE_COLUMNS} FROM milestones WHERE id=?1"),
        params![id],
        milestone_from_row,
    )
    .optional()?
    .ok_or(StoreError::UnknownId("milestone"))
}

pub(in crate::store) fn load_template(
    conn: &Connection,
    id: &str,
) -> Result<MilestoneTemplateRow, StoreError> {
    conn.query_row(
        &format!("SELECT {TEMPLATE_COLUMNS} FROM milestone_templates WHERE id=?1"),
        params![id],
        template_from_row,
    )
    .optional()?
    .ok_or(StoreError::UnknownId("milestone template"))
}

pub(in crate::store) fn load_project_milestones(
    conn: &Connection,
    project_id: &str,
) -> Result<Vec<MilestoneRow>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MILESTONE_COLUMNS} FROM milestones WHERE project_id=?1 ORDER BY rowid"
    ))?;
    let rows = stmt.query_map(params![project_id], milestone_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
