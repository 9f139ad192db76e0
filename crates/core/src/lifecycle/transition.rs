#![forbid(unsafe_code)]

use crate::dates::CalendarDate;
use crate::model::MilestoneStatus;

#[derive(Clone, Debug, PartialEq)]
pub struct MilestoneState {
    pub status: MilestoneStatus,
    pub completion_percentage: f64,
    pub rejection_reason: Option<String>,
    pub completed_date: Option<CalendarDate>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MilestoneAction {
    Submit,
    Approve,
    Reject { reason: String },
    ReportProgress { completion_percentage: f64 },
}

impl MilestoneAction {
    pub fn name(&self) -> &'static str {
        match self {
            MilestoneAction::Submit => "submit",
            MilestoneAction::Approve => "approve",
            MilestoneAction::Reject { .. } => "reject",
            MilestoneAction::ReportProgress { .. } => "report_progress",
        }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot {action} a milestone in status {from}")]
    InvalidTransition {
        from: MilestoneStatus,
        action: &'static str,
    },
    #[error("rejection reason must not be empty")]
    ReasonRequired,
    #[error("completion percentage must be between 0 and 100 (got {value})")]
    PercentageOutOfRange { value: f64 },
}

impl MilestoneStatus {
    /// Terminal statuses never become overdue.
    pub fn is_terminal(self) -> bool {
        matches!(self, MilestoneStatus::Approved | MilestoneStatus::Completed)
    }

    pub fn accepts_submission(self) -> bool {
        matches!(
            self,
            MilestoneStatus::Pending
                | MilestoneStatus::InProgress
                | MilestoneStatus::Completed
                | MilestoneStatus::Rejected
                | MilestoneStatus::Overdue
        )
    }

    pub fn accepts_progress_report(self) -> bool {
        matches!(
            self,
            MilestoneStatus::Pending
                | MilestoneStatus::InProgress
                | MilestoneStatus::Rejected
                | MilestoneStatus::Overdue
        )
    }

    pub fn awaits_review(self) -> bool {
        self == MilestoneStatus::PendingCompletionReview
    }
}

pub fn validate_percentage(value: f64) -> Result<f64, TransitionError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(TransitionError::PercentageOutOfRange { value });
    }
    Ok(value)
}

/// Applies `action` to `state`. Input validation runs before the status check,
/// so an invalid request never reaches the state table.
pub fn transition(
    state: &MilestoneState,
    action: &MilestoneAction,
    today: CalendarDate,
) -> Result<MilestoneState, TransitionError> {
    let invalid = || TransitionError::InvalidTransition {
        from: state.status,
        action: action.name(),
    };

    match action {
        MilestoneAction::Submit => {
            if !state.status.accepts_submission() {
                return Err(invalid());
            }
            Ok(MilestoneState {
                status: MilestoneStatus::PendingCompletionReview,
                completion_percentage: 100.0,
                rejection_reason: None,
                completed_date: None,
            })
        }
        MilestoneAction::Approve => match state.status {
            MilestoneStatus::PendingCompletionReview => Ok(MilestoneState {
                status: MilestoneStatus::Approved,
                completion_percentage: 100.0,
                rejection_reason: None,
                completed_date: Some(today),
            }),
            // Re-approving is a no-op: concurrent reviewers without a revision
            // guard both succeed.
            MilestoneStatus::Approved => Ok(MilestoneState {
                completion_percentage: 100.0,
                completed_date: state.completed_date.or(Some(today)),
                ..state.clone()
            }),
            _ => Err(invalid()),
        },
        MilestoneAction::Reject { reason } => {
            let reason = reason.trim();
            if reason.is_empty() {
                return Err(TransitionError::ReasonRequired);
            }
            if !state.status.awaits_review() {
                return Err(invalid());
            }
            Ok(MilestoneState {
                status: MilestoneStatus::Rejected,
                completion_percentage: 0.0,
                rejection_reason: Some(reason.to_string()),
                completed_date: None,
            })
        }
        MilestoneAction::ReportProgress {
            completion_percentage,
        } => {
            let value = validate_percentage(*completion_percentage)?;
            if !state.status.accepts_progress_report() {
                return Err(invalid());
            }
            let done = value >= 100.0;
            Ok(MilestoneState {
                status: if done {
                    MilestoneStatus::Completed
                } else {
                    MilestoneStatus::InProgress
                },
                completion_percentage: value,
                rejection_reason: state.rejection_reason.clone(),
                completed_date: done.then_some(today),
            })
        }
    }
}
