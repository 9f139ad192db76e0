#![forbid(unsafe_code)]

use super::super::milestones::milestone_record_id;
use super::super::*;
use crate::bucket::EvidenceBucket;
use mt_core::dates::CalendarDate;
use mt_core::ids::RecordKind;
use mt_core::lifecycle::{MilestoneAction, transition};

const FALLBACK_EXTENSION: &str = "bin";
const MAX_EXTENSION_LEN: usize = 10;
const FALLBACK_MIME: &str = "application/octet-stream";

struct StagedFile {
    upload: EvidenceUpload,
    path: String,
    uploaded_at_ms: i64,
}

impl SqliteStore {
    /// Attaches evidence and moves the milestone into review, all or nothing.
    ///
    /// Every file is staged first. If any staging fails the staged blobs are
    /// discarded and [`StoreError::EvidenceUpload`] names the failed files; no
    /// row is written. Otherwise evidence rows, the status change and the notes
    /// commit in one transaction, with blobs promoted just before commit.
    pub fn submit_for_review(
        &mut self,
        request: SubmitForReviewRequest,
    ) -> Result<SubmissionReceipt, StoreError> {
        let SubmitForReviewRequest {
            milestone_id,
            files,
            notes,
            uploaded_by,
            expected_revision,
            now_ms,
        } = request;
        let milestone_id = milestone_record_id(&milestone_id)?;
        let uploaded_by = required_text(&uploaded_by, "uploaded_by must not be empty")?;
        if files.iter().any(|file| file.file_name.trim().is_empty()) {
            return Err(StoreError::InvalidInput("file_name must not be empty"));
        }
        let notes = optional_text(notes);

        let current = load_milestone(&self.conn, &milestone_id)?;
        check_revision(expected_revision, current.revision)?;
        transition(
            &current.state(),
            &MilestoneAction::Submit,
            CalendarDate::from_unix_ms(now_ms),
        )?;
        if current.evidence_required && files.is_empty() {
            return Err(StoreError::InvalidInput(
                "this milestone requires at least one evidence file",
            ));
        }

        let last_upload: Option<i64> = self.conn.query_row(
            "SELECT MAX(uploaded_at_ms) FROM evidence WHERE milestone_id=?1",
            params![&milestone_id],
            |row| row.get(0),
        )?;
        let base_ms = last_upload.map_or(now_ms, |last| last.saturating_add(1).max(now_ms));
        let staged = files
            .into_iter()
            .zip(base_ms..)
            .map(|(upload, uploaded_at_ms)| StagedFile {
                path: evidence_object_name(&milestone_id, uploaded_at_ms, &upload.file_name),
                uploaded_at_ms,
                upload,
            })
            .collect::<Vec<_>>();

        stage_all(self.bucket.as_ref(), &milestone_id, &staged)?;

        let mut promoted = Vec::new();
        let committed = commit_submission(
            &mut self.conn,
            self.bucket.as_ref(),
            SubmissionArgs {
                milestone_id: &milestone_id,
                staged: &staged,
                notes: notes.as_deref(),
                uploaded_by: &uploaded_by,
                expected_revision,
                now_ms,
            },
            &mut promoted,
        );

        match committed {
            Ok(receipt) => {
                tracing::info!(
                    milestone_id = %milestone_id,
                    files = receipt.evidence.len(),
                    "milestone submitted for review"
                );
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(milestone_id = %milestone_id, error = %err, "submission rolled back");
                for file in &staged {
                    if let Err(cleanup) = self.bucket.discard(&file.path) {
                        tracing::warn!(path = %file.path, error = %cleanup, "staged blob not discarded");
                    }
                }
                for path in &promoted {
                    if let Err(cleanup) = self.bucket.remove(path) {
                        tracing::warn!(path = %path, error = %cleanup, "promoted blob not removed");
                    }
                }
                Err(err)
            }
        }
    }
}

/// Object name `{milestoneId}_{timestamp}.{ext}`; files without a usable
/// extension get `bin`.
fn evidence_object_name(
    milestone_id: &str,
    timestamp_ms: i64,
    file_name: &str,
) -> String {
    format!("{milestone_id}_{timestamp_ms}.{}", file_extension(file_name))
}

fn file_extension(file_name: &str) -> String {
    file_name
        .trim()
        .rsplit_once('.')
        .map(|(stem, ext)| (stem, ext.to_ascii_lowercase()))
        .filter(|(stem, ext)| {
            !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.bytes().all(|b| b.is_ascii_alphanumeric())
        })
        .map(|(_, ext)| ext)
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}

fn guess_mime(file_name: &str) -> &'static str {
    match file_extension(file_name).as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "zip" => "application/zip",
        "mp4" => "video/mp4",
        _ => FALLBACK_MIME,
    }
}

fn stage_all(
    bucket: &dyn EvidenceBucket,
    milestone_id: &str,
    staged: &[StagedFile],
) -> Result<(), StoreError> {
    let mut failed = Vec::new();
    for file in staged {
        if let Err(err) = bucket.stage(&file.path, &file.upload.bytes) {
            tracing::warn!(
                milestone_id,
                file = %file.upload.file_name,
                error = %err,
                "evidence staging failed"
            );
            failed.push(file.upload.file_name.clone());
        }
    }
    if failed.is_empty() {
        return Ok(());
    }

    for file in staged {
        if let Err(err) = bucket.discard(&file.path) {
            tracing::warn!(path = %file.path, error = %err, "staged blob not discarded");
        }
    }
    Err(StoreError::EvidenceUpload { failed })
}

struct SubmissionArgs<'a> {
    milestone_id: &'a str,
    staged: &'a [StagedFile],
    notes: Option<&'a str>,
    uploaded_by: &'a str,
    expected_revision: Option<i64>,
    now_ms: i64,
}

fn commit_submission(
    conn: &mut Connection,
    bucket: &dyn EvidenceBucket,
    args: SubmissionArgs<'_>,
    promoted: &mut Vec<String>,
) -> Result<SubmissionReceipt, StoreError> {
    let tx = conn.transaction()?;
    let (before, after) = transition_milestone_tx(
        &tx,
        TransitionTxArgs {
            milestone_id: args.milestone_id,
            expected_revision: args.expected_revision,
            action: &MilestoneAction::Submit,
            vendor_notes: args.notes,
            now_ms: args.now_ms,
        },
    )?;

    let mut evidence = Vec::with_capacity(args.staged.len());
    for file in args.staged {
        let id = next_id_tx(&tx, RecordKind::Evidence)?;
        let file_size = i64::try_from(file.upload.bytes.len())
            .map_err(|_| StoreError::InvalidInput("evidence file is too large"))?;
        let mime_type = optional_text(file.upload.mime_type.clone())
            .unwrap_or_else(|| guess_mime(&file.upload.file_name).to_string());
        let row = EvidenceRow {
            id,
            milestone_id: args.milestone_id.to_string(),
            file_name: file.upload.file_name.trim().to_string(),
            file_path: file.path.clone(),
            mime_type,
            file_size,
            description: optional_text(file.upload.description.clone()),
            uploaded_by: args.uploaded_by.to_string(),
            uploaded_at_ms: file.uploaded_at_ms,
            public_url: bucket.public_url(&file.path),
        };
        tx.execute(
            &format!("INSERT INTO evidence({EVIDENCE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
            params![
                &row.id,
                &row.milestone_id,
                &row.file_name,
                &row.file_path,
                &row.mime_type,
                row.file_size,
                &row.description,
                &row.uploaded_by,
                row.uploaded_at_ms
            ],
        )?;
        evidence.push(row);
    }

    emit_milestone_event_tx(
        &tx,
        MilestoneEventArgs {
            milestone_id: args.milestone_id,
            now_ms: args.now_ms,
            event_type: "submitted_for_review",
            actor: Some(args.uploaded_by),
            payload: serde_json::json!({
                "from": before.status.as_str(),
                "to": after.status.as_str(),
                "evidence": evidence.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            }),
        },
    )?;

    for file in args.staged {
        bucket.promote(&file.path)?;
        promoted.push(file.path.clone());
    }
    tx.commit()?;

    Ok(SubmissionReceipt {
        milestone: after,
        evidence,
    })
}
