#![forbid(unsafe_code)]

mod create;
mod get;
mod templates;
mod vendor;

use mt_core::ids::RecordKind;

pub(super) fn milestone_record_id(value: &str) -> Result<String, super::StoreError> {
    super::record_id(
        RecordKind::Milestone,
        value,
        "milestone_id must look like MS-<number>",
    )
}

pub(super) fn template_record_id(value: &str) -> Result<String, super::StoreError> {
    super::record_id(
        RecordKind::MilestoneTemplate,
        value,
        "template_id must look like TPL-<number>",
    )
}
