#![forbid(unsafe_code)]

use crate::*;
use mt_core::progress::round1;
use serde_json::{Value, json};

const DEFAULT_MONTHS: usize = 6;
const MAX_MONTHS: usize = 24;

impl McpServer {
    pub(crate) fn tool_analytics_summary(&mut self, args: &Args) -> Result<Value, Value> {
        let months = optional_usize(args, "months")?.unwrap_or(DEFAULT_MONTHS);
        if !(1..=MAX_MONTHS).contains(&months) {
            return Err(ai_error(
                "INVALID_INPUT",
                &format!("months must be between 1 and {MAX_MONTHS}"),
            ));
        }
        let today = date_or(args, "as_of", today_utc())?;
        let summary = self
            .store
            .analytics_summary(today, months)
            .map_err(store_error)?;

        let portfolio = &summary.portfolio;
        Ok(ai_ok(
            "analytics_summary",
            json!({
                "as_of": today.to_string(),
                "portfolio": {
                    "total_projects": portfolio.total_projects,
                    "total_budget": portfolio.total_budget,
                    "total_milestones": portfolio.total_milestones,
                    "total_purchase_orders": portfolio.total_purchase_orders,
                    "completion_rate": round1(portfolio.completion_rate),
                    "overdue_milestones": portfolio.overdue_milestones
                },
                "months": summary.months.iter().map(|bucket| json!({
                    "month": bucket.month.to_string(),
                    "label": bucket.label,
                    "projects": bucket.projects,
                    "budget": bucket.budget
                })).collect::<Vec<_>>()
            }),
        ))
    }

    pub(crate) fn tool_analytics_vendors(&mut self, args: &Args) -> Result<Value, Value> {
        let today = date_or(args, "as_of", today_utc())?;
        let rows = self.store.vendor_performance(today).map_err(store_error)?;
        Ok(ai_ok(
            "analytics_vendors",
            json!({
                "as_of": today.to_string(),
                "vendors": rows.iter().map(|row| {
                    let p = &row.performance;
                    json!({
                        "vendor_id": p.vendor_id,
                        "vendor_name": row.vendor_name,
                        "total_milestones": p.total_milestones,
                        "approved_milestones": p.approved_milestones,
                        "rejected_milestones": p.rejected_milestones,
                        "pending_review_milestones": p.pending_review_milestones,
                        "overdue_milestones": p.overdue_milestones,
                        "average_completion": round1(p.average_completion)
                    })
                }).collect::<Vec<_>>()
            }),
        ))
    }
}
