#![forbid(unsafe_code)]

use mt_core::dates::CalendarDate;
use mt_core::lifecycle::MilestoneState;
use mt_core::model::MilestoneStatus;
use mt_core::progress::{self, MilestoneSnapshot};

#[derive(Clone, Debug)]
pub struct CreateMilestoneRequest {
    pub project_id: String,
    pub purchase_order_id: Option<String>,
    /// Fills name, description, weight and evidence flag when those are
    /// left blank.
    pub template_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub weight_percentage: Option<f64>,
    pub due_date: Option<String>,
    pub evidence_required: Option<bool>,
    pub now_ms: i64,
}

#[derive(Clone, Debug)]
pub struct CreateMilestoneTemplateRequest {
    pub name: String,
    pub description: Option<String>,
    pub default_weight_percentage: f64,
    pub default_evidence_required: bool,
    pub now_ms: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MilestoneTemplateRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub default_weight_percentage: f64,
    pub default_evidence_required: bool,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug)]
pub struct ListMilestonesRequest {
    pub project_id: Option<String>,
    /// Matches either the stored or the displayed status.
    pub status: Option<MilestoneStatus>,
    pub today: CalendarDate,
}

#[derive(Clone, Debug)]
pub struct UpdateVendorNotesRequest {
    pub milestone_id: String,
    pub notes: String,
    pub now_ms: i64,
}

#[derive(Clone, Debug)]
pub struct ReportProgressRequest {
    pub milestone_id: String,
    pub completion_percentage: f64,
    pub expected_revision: Option<i64>,
    pub reported_by: String,
    pub now_ms: i64,
}

/// One file of a submission, already read into memory.
#[derive(Clone, Debug)]
pub struct EvidenceUpload {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub description: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct SubmitForReviewRequest {
    pub milestone_id: String,
    pub files: Vec<EvidenceUpload>,
    pub notes: Option<String>,
    pub uploaded_by: String,
    pub expected_revision: Option<i64>,
    pub now_ms: i64,
}

#[derive(Clone, Debug)]
pub struct ApproveMilestoneRequest {
    pub milestone_id: String,
    pub expected_revision: Option<i64>,
    pub reviewed_by: Option<String>,
    pub now_ms: i64,
}

#[derive(Clone, Debug)]
pub struct RejectMilestoneRequest {
    pub milestone_id: String,
    pub reason: String,
    pub expected_revision: Option<i64>,
    pub reviewed_by: Option<String>,
    pub now_ms: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MilestoneRow {
    pub id: String,
    pub project_id: String,
    pub purchase_order_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub weight_percentage: f64,
    pub completion_percentage: f64,
    /// Stored status; see [`MilestoneRow::display_status`] for the derived one.
    pub status: MilestoneStatus,
    pub due_date: Option<CalendarDate>,
    pub completed_date: Option<CalendarDate>,
    pub vendor_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub evidence_required: bool,
    pub revision: i64,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
    pub template_id: Option<String>,
}

impl MilestoneRow {
    pub fn state(&self) -> MilestoneState {
        MilestoneState {
            status: self.status,
            completion_percentage: self.completion_percentage,
            rejection_reason: self.rejection_reason.clone(),
            completed_date: self.completed_date,
        }
    }

    pub fn snapshot(&self) -> MilestoneSnapshot {
        MilestoneSnapshot {
            status: self.status,
            weight_percentage: self.weight_percentage,
            completion_percentage: self.completion_percentage,
            due_date: self.due_date,
        }
    }

    pub fn display_status(&self, today: CalendarDate) -> MilestoneStatus {
        progress::effective_status(self.status, self.due_date, today)
    }

    pub fn is_overdue(&self, today: CalendarDate) -> bool {
        progress::is_overdue(self.status, self.due_date, today)
    }
}

/// Milestone joined with the names a list view shows next to it.
#[derive(Clone, Debug, PartialEq)]
pub struct MilestoneProgressRow {
    pub milestone: MilestoneRow,
    pub display_status: MilestoneStatus,
    pub project_name: String,
    pub po_number: Option<String>,
    pub evidence_count: usize,
    pub is_overdue: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EvidenceRow {
    pub id: String,
    pub milestone_id: String,
    pub file_name: String,
    pub file_path: String,
    pub mime_type: String,
    pub file_size: i64,
    pub description: Option<String>,
    pub uploaded_by: String,
    pub uploaded_at_ms: i64,
    pub public_url: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubmissionReceipt {
    pub milestone: MilestoneRow,
    pub evidence: Vec<EvidenceRow>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MilestoneEventRow {
    pub seq: i64,
    pub milestone_id: String,
    pub ts_ms: i64,
    pub event_type: String,
    pub actor: Option<String>,
    pub payload_json: String,
}

impl MilestoneEventRow {
    pub fn event_id(&self) -> String {
        format!("evt_{:016}", self.seq)
    }
}
