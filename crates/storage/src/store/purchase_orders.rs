#![forbid(unsafe_code)]

use super::projects::project_record_id;
use super::*;
use mt_core::ids::RecordKind;
use mt_core::model::PurchaseOrderStatus;

impl SqliteStore {
    pub fn create_purchase_order(
        &mut self,
        request: CreatePurchaseOrderRequest,
    ) -> Result<PurchaseOrderRow, StoreError> {
        let CreatePurchaseOrderRequest {
            po_number,
            project_id,
            vendor_id,
            title,
            description,
            total_amount,
            currency: requested_currency,
            issue_date,
            expected_delivery_date,
            now_ms,
        } = request;

        let po_number = required_text(&po_number, "po_number must not be empty")?;
        let title = required_text(&title, "purchase order title must not be empty")?;
        let project_id = project_record_id(&project_id)?;
        let vendor_id = record_id(
            RecordKind::Organization,
            &vendor_id,
            "vendor_id must look like ORG-<number>",
        )?;
        let total_amount = amount(total_amount, "total_amount must be a non-negative number")?;
        let currency = currency(requested_currency)?;
        let issue_date = optional_date(issue_date.as_deref(), "issue_date must be YYYY-MM-DD")?;
        let expected_delivery_date = optional_date(
            expected_delivery_date.as_deref(),
            "expected_delivery_date must be YYYY-MM-DD",
        )?;

        let tx = self.conn.transaction()?;
        load_project(&tx, &project_id)?;
        load_organization(&tx, &vendor_id)?;

        let id = next_id_tx(&tx, RecordKind::PurchaseOrder)?;
        let row = PurchaseOrderRow {
            id,
            po_number,
            project_id,
            vendor_id,
            title,
            description: optional_text(description),
            total_amount,
            currency,
            status: PurchaseOrderStatus::Draft,
            issue_date,
            expected_delivery_date,
            created_at_ms: now_ms,
        };
        let inserted = tx.execute(
            r#"
            INSERT INTO purchase_orders(id, po_number, project_id, vendor_id, title, description,
                                        total_amount, currency, status, issue_date,
                                        expected_delivery_date, created_at_ms, updated_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
            "#,
            params![
                &row.id,
                &row.po_number,
                &row.project_id,
                &row.vendor_id,
                &row.title,
                &row.description,
                row.total_amount,
                &row.currency,
                row.status.as_str(),
                row.issue_date.map(|d| d.to_string()),
                row.expected_delivery_date.map(|d| d.to_string()),
                now_ms
            ],
        );
        match inserted {
            Err(err) if is_unique_violation(&err) => {
                return Err(StoreError::Conflict("po_number is already in use"));
            }
            other => {
                other?;
            }
        }
        tx.commit()?;
        Ok(row)
    }

    pub fn list_purchase_orders(
        &self,
        project_id: Option<&str>,
    ) -> Result<Vec<PurchaseOrderRow>, StoreError> {
        let project_id = project_id.map(project_record_id).transpose()?;
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {PURCHASE_ORDER_COLUMNS} FROM purchase_orders
            WHERE ?1 IS NULL OR project_id = ?1
            ORDER BY rowid
            "#
        ))?;
        let rows = stmt.query_map(params![project_id], purchase_order_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
