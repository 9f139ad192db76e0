#![forbid(unsafe_code)]

use super::*;
use mt_core::dates::CalendarDate;
use mt_core::progress::{
    ProjectFigures, compute_project_progress, monthly_activity, portfolio_summary,
    vendor_performance,
};
use std::collections::BTreeMap;

impl SqliteStore {
    /// Portfolio totals plus per-month project intake for the last `months`.
    pub fn analytics_summary(
        &self,
        today: CalendarDate,
        months: usize,
    ) -> Result<AnalyticsSummary, StoreError> {
        let figures = self.project_figures(today)?;
        Ok(AnalyticsSummary {
            portfolio: portfolio_summary(&figures),
            months: monthly_activity(&figures, today, months),
        })
    }

    /// Milestone outcomes per vendor organisation. A milestone counts for the
    /// vendor of its purchase order, else the vendor of its project.
    pub fn vendor_performance(
        &self,
        today: CalendarDate,
    ) -> Result<Vec<VendorPerformanceRow>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {}, COALESCE(po.vendor_id, p.vendor_id) AS vendor
            FROM milestones m
            JOIN projects p ON p.id = m.project_id
            LEFT JOIN purchase_orders po ON po.id = m.purchase_order_id
            WHERE COALESCE(po.vendor_id, p.vendor_id) IS NOT NULL
            ORDER BY m.rowid
            "#,
            qualified(MILESTONE_COLUMNS, "m")
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(MILESTONE_COLUMN_COUNT)?,
                milestone_from_row(row)?.snapshot(),
            ))
        })?;
        let rows = rows.collect::<Result<Vec<_>, _>>()?;

        let performance = vendor_performance(
            rows.iter().map(|(vendor, snapshot)| (vendor.as_str(), snapshot)),
            today,
        );
        performance
            .into_iter()
            .map(|performance| {
                let vendor_name = load_organization(&self.conn, &performance.vendor_id)?.name;
                Ok(VendorPerformanceRow {
                    vendor_name,
                    performance,
                })
            })
            .collect()
    }

    fn project_figures(&self, today: CalendarDate) -> Result<Vec<ProjectFigures>, StoreError> {
        let mut milestones: BTreeMap<String, Vec<_>> = BTreeMap::new();
        {
            let mut stmt = self
                .conn
                .prepare(&format!("SELECT {MILESTONE_COLUMNS} FROM milestones ORDER BY rowid"))?;
            let rows = stmt.query_map([], milestone_from_row)?;
            for row in rows {
                let row = row?;
                milestones
                    .entry(row.project_id.clone())
                    .or_default()
                    .push(row.snapshot());
            }
        }

        let mut purchase_orders: BTreeMap<String, i64> = BTreeMap::new();
        {
            let mut stmt = self
                .conn
                .prepare("SELECT project_id, COUNT(*) FROM purchase_orders GROUP BY project_id")?;
            let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get(1)?)))?;
            for row in rows {
                let (project_id, count) = row?;
                purchase_orders.insert(project_id, count);
            }
        }

        let mut stmt = self
            .conn
            .prepare("SELECT id, budget, created_at_ms FROM projects ORDER BY rowid")?;
        let projects = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<f64>>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        let mut figures = Vec::new();
        for project in projects {
            let (id, budget, created_at_ms) = project?;
            let snapshots = milestones.remove(&id).unwrap_or_default();
            let rollup = compute_project_progress(&snapshots, today);
            figures.push(ProjectFigures {
                created_on: CalendarDate::from_unix_ms(created_at_ms),
                budget,
                total_milestones: rollup.total_milestones,
                completed_percentage: rollup.completed_percentage,
                overdue_milestones: rollup.overdue_milestones,
                purchase_orders: purchase_orders
                    .get(&id)
                    .and_then(|count| usize::try_from(*count).ok())
                    .unwrap_or_default(),
            });
        }
        Ok(figures)
    }
}
