#![forbid(unsafe_code)]

//! Rollups over milestone and project rows: overdue derivation, weighted
//! project completion, portfolio analytics and vendor performance.

use crate::dates::CalendarDate;
use crate::model::MilestoneStatus;
use std::collections::BTreeMap;

/// Upper bound for the summed milestone weights of one project.
pub const WEIGHT_BUDGET: f64 = 100.0;
const WEIGHT_EPSILON: f64 = 1e-9;

pub fn is_overdue(status: MilestoneStatus, due_date: Option<CalendarDate>, today: CalendarDate) -> bool {
    if status.is_terminal() {
        return false;
    }
    if status == MilestoneStatus::Overdue {
        return true;
    }
    due_date.is_some_and(|due| due < today)
}

pub fn effective_status(
    status: MilestoneStatus,
    due_date: Option<CalendarDate>,
    today: CalendarDate,
) -> MilestoneStatus {
    if is_overdue(status, due_date, today) {
        MilestoneStatus::Overdue
    } else {
        status
    }
}

pub fn fits_weight_budget(existing_total: f64, requested: f64) -> bool {
    existing_total + requested <= WEIGHT_BUDGET + WEIGHT_EPSILON
}

/// Display rounding: one decimal place.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}", round1(value))
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Clone, Debug, PartialEq)]
pub struct MilestoneSnapshot {
    pub status: MilestoneStatus,
    pub weight_percentage: f64,
    pub completion_percentage: f64,
    pub due_date: Option<CalendarDate>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectRollup {
    pub total_milestones: usize,
    pub completed_percentage: f64,
    pub overdue_milestones: usize,
    pub approved_milestones: usize,
    pub pending_review_milestones: usize,
    pub weight_total: f64,
}

/// Weighted completion: Σ(wᵢ·cᵢ)/Σwᵢ, falling back to the plain mean when no
/// milestone carries weight.
pub fn compute_project_progress(milestones: &[MilestoneSnapshot], today: CalendarDate) -> ProjectRollup {
    let mut rollup = ProjectRollup {
        total_milestones: milestones.len(),
        ..ProjectRollup::default()
    };
    if milestones.is_empty() {
        return rollup;
    }

    let mut weighted = 0.0;
    let mut plain = 0.0;
    for m in milestones {
        rollup.weight_total += m.weight_percentage;
        weighted += m.weight_percentage * m.completion_percentage;
        plain += m.completion_percentage;
        if is_overdue(m.status, m.due_date, today) {
            rollup.overdue_milestones += 1;
        }
        match m.status {
            MilestoneStatus::Approved => rollup.approved_milestones += 1,
            MilestoneStatus::PendingCompletionReview => rollup.pending_review_milestones += 1,
            _ => {}
        }
    }

    rollup.completed_percentage = if rollup.weight_total > 0.0 {
        weighted / rollup.weight_total
    } else {
        plain / milestones.len() as f64
    };
    rollup
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectFigures {
    pub created_on: CalendarDate,
    pub budget: Option<f64>,
    pub total_milestones: usize,
    pub completed_percentage: f64,
    pub overdue_milestones: usize,
    pub purchase_orders: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PortfolioSummary {
    pub total_projects: usize,
    pub total_budget: f64,
    pub total_milestones: usize,
    pub total_purchase_orders: usize,
    pub completion_rate: f64,
    pub overdue_milestones: usize,
}

pub fn portfolio_summary(projects: &[ProjectFigures]) -> PortfolioSummary {
    let mut summary = PortfolioSummary {
        total_projects: projects.len(),
        ..PortfolioSummary::default()
    };
    let mut completion_sum = 0.0;
    for p in projects {
        summary.total_budget += p.budget.unwrap_or(0.0);
        summary.total_milestones += p.total_milestones;
        summary.total_purchase_orders += p.purchase_orders;
        summary.overdue_milestones += p.overdue_milestones;
        completion_sum += p.completed_percentage;
    }
    if !projects.is_empty() {
        summary.completion_rate = completion_sum / projects.len() as f64;
    }
    summary
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthBucket {
    pub month: CalendarDate,
    pub label: String,
    pub projects: usize,
    pub budget: f64,
}

/// The last `months` calendar months ending with the month of `today`, oldest
/// first, counting projects by creation month.
pub fn monthly_activity(projects: &[ProjectFigures], today: CalendarDate, months: usize) -> Vec<MonthBucket> {
    let current = today.month_index();
    (0..months as i64)
        .rev()
        .map(|back| {
            let index = current - back;
            let month = CalendarDate::first_of_month_index(index);
            let in_month = projects
                .iter()
                .filter(|p| p.created_on.month_index() == index)
                .collect::<Vec<_>>();
            MonthBucket {
                month,
                label: month.month_label(),
                projects: in_month.len(),
                budget: in_month.iter().map(|p| p.budget.unwrap_or(0.0)).sum(),
            }
        })
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VendorPerformance {
    pub vendor_id: String,
    pub total_milestones: usize,
    pub approved_milestones: usize,
    pub rejected_milestones: usize,
    pub pending_review_milestones: usize,
    pub overdue_milestones: usize,
    pub average_completion: f64,
}

pub fn vendor_performance<'a, I>(rows: I, today: CalendarDate) -> Vec<VendorPerformance>
where
    I: IntoIterator<Item = (&'a str, &'a MilestoneSnapshot)>,
{
    let mut by_vendor: BTreeMap<&str, (VendorPerformance, f64)> = BTreeMap::new();
    for (vendor_id, m) in rows {
        let (entry, completion_sum) = by_vendor.entry(vendor_id).or_insert_with(|| {
            (
                VendorPerformance {
                    vendor_id: vendor_id.to_string(),
                    ..VendorPerformance::default()
                },
                0.0,
            )
        });
        entry.total_milestones += 1;
        *completion_sum += m.completion_percentage;
        match m.status {
            MilestoneStatus::Approved => entry.approved_milestones += 1,
            MilestoneStatus::Rejected => entry.rejected_milestones += 1,
            MilestoneStatus::PendingCompletionReview => entry.pending_review_milestones += 1,
            _ => {}
        }
        if is_overdue(m.status, m.due_date, today) {
            entry.overdue_milestones += 1;
        }
    }

    by_vendor
        .into_values()
        .map(|(mut perf, completion_sum)| {
            perf.average_completion = completion_sum / perf.total_milestones as f64;
            perf
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> CalendarDate {
        CalendarDate::parse(raw).unwrap()
    }

    fn snapshot(status: MilestoneStatus, weight: f64, completion: f64, due: &str) -> MilestoneSnapshot {
        MilestoneSnapshot {
            status,
            weight_percentage: weight,
            completion_percentage: completion,
            due_date: Some(date(due)),
        }
    }

    #[test]
    fn overdue_is_derived_for_open_milestones_only() {
        let today = date("2026-10-19");
        let past = Some(date("2026-10-18"));
        assert!(is_overdue(MilestoneStatus::InProgress, past, today));
        assert!(is_overdue(MilestoneStatus::Rejected, past, today));
        assert!(!is_overdue(MilestoneStatus::Approved, past, today));
        assert!(!is_overdue(MilestoneStatus::Completed, past, today));
        assert!(!is_overdue(MilestoneStatus::InProgress, Some(today), today));
        assert!(!is_overdue(MilestoneStatus::Pending, None, today));
        assert_eq!(
            effective_status(MilestoneStatus::Pending, past, today),
            MilestoneStatus::Overdue
        );
    }

    #[test]
    fn project_progress_is_weight_normalised() {
        let today = date("2026-10-19");
        let rollup = compute_project_progress(
            &[
                snapshot(MilestoneStatus::Approved, 30.0, 100.0, "2026-09-01"),
                snapshot(MilestoneStatus::InProgress, 50.0, 40.0, "2026-10-01"),
                snapshot(MilestoneStatus::PendingCompletionReview, 20.0, 100.0, "2026-12-01"),
            ],
            today,
        );
        assert_eq!(rollup.total_milestones, 3);
        assert_eq!(rollup.weight_total, 100.0);
        assert!((rollup.completed_percentage - 70.0).abs() < 1e-9);
        assert_eq!(rollup.overdue_milestones, 1);
        assert_eq!(rollup.approved_milestones, 1);
        assert_eq!(rollup.pending_review_milestones, 1);
        assert_eq!(format_percent(rollup.completed_percentage), "70.0");
    }

    #[test]
    fn project_progress_handles_empty_and_unweighted_projects() {
        let today = date("2026-10-19");
        assert_eq!(compute_project_progress(&[], today), ProjectRollup::default());

        let rollup = compute_project_progress(
            &[
                snapshot(MilestoneStatus::InProgress, 0.0, 20.0, "2027-01-01"),
                snapshot(MilestoneStatus::InProgress, 0.0, 45.0, "2027-01-01"),
            ],
            today,
        );
        assert!((rollup.completed_percentage - 32.5).abs() < 1e-9);
    }

    #[test]
    fn weight_budget_allows_exactly_one_hundred() {
        assert!(fits_weight_budget(70.0, 30.0));
        assert!(fits_weight_budget(0.1 + 0.2, 99.7));
        assert!(!fits_weight_budget(70.0, 30.5));
    }

    #[test]
    fn format_percent_rounds_to_one_decimal() {
        assert_eq!(format_percent(66.666), "66.7");
        assert_eq!(format_percent(0.0), "0.0");
        assert_eq!(format_percent(100.0), "100.0");
    }

    #[test]
    fn monthly_activity_buckets_last_months_oldest_first() {
        let projects = vec![
            ProjectFigures {
                created_on: date("2026-10-02"),
                budget: Some(1000.0),
                total_milestones: 2,
                completed_percentage: 50.0,
                overdue_milestones: 1,
                purchase_orders: 1,
            },
            ProjectFigures {
                created_on: date("2026-08-15"),
                budget: None,
                total_milestones: 0,
                completed_percentage: 0.0,
                overdue_milestones: 0,
                purchase_orders: 0,
            },
            ProjectFigures {
                created_on: date("2025-01-15"),
                budget: Some(5.0),
                total_milestones: 1,
                completed_percentage: 100.0,
                overdue_milestones: 0,
                purchase_orders: 2,
            },
        ];
        let months = monthly_activity(&projects, date("2026-10-19"), 6);
        let labels = months.iter().map(|m| m.label.as_str()).collect::<Vec<_>>();
        assert_eq!(
            labels,
            vec!["May 2026", "Jun 2026", "Jul 2026", "Aug 2026", "Sep 2026", "Oct 2026"]
        );
        assert_eq!(months[3].projects, 1);
        assert_eq!(months[5].projects, 1);
        assert_eq!(months[5].budget, 1000.0);

        let summary = portfolio_summary(&projects);
        assert_eq!(summary.total_projects, 3);
        assert_eq!(summary.total_budget, 1005.0);
        assert_eq!(summary.total_purchase_orders, 3);
        assert!((summary.completion_rate - 50.0).abs() < 1e-9);
    }

    #[test]
    fn vendor_performance_groups_by_vendor() {
        let today = date("2026-10-19");
        let a = snapshot(MilestoneStatus::Approved, 50.0, 100.0, "2026-01-01");
        let b = snapshot(MilestoneStatus::Rejected, 50.0, 0.0, "2026-01-01");
        let c = snapshot(MilestoneStatus::PendingCompletionReview, 10.0, 100.0, "2027-01-01");
        let rows = vec![("ORG-002", &a), ("ORG-001", &b), ("ORG-002", &c)];
        let perf = vendor_performance(rows, today);
        assert_eq!(perf.len(), 2);
        assert_eq!(perf[0].vendor_id, "ORG-001");
        assert_eq!(perf[0].rejected_milestones, 1);
        assert_eq!(perf[0].overdue_milestones, 1);
        assert_eq!(perf[1].total_milestones, 2);
        assert_eq!(perf[1].approved_milestones, 1);
        assert_eq!(perf[1].pending_review_milestones, 1);
        assert_eq!(perf[1].average_completion, 100.0);
    }
}
