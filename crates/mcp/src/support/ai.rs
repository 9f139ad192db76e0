#![forbid(unsafe_code)]

use mt_core::lifecycle::TransitionError;
use mt_storage::StoreError;
use serde_json::{Value, json};

pub(crate) fn ai_ok_with_warnings(
    intent: &str,
    result: Value,
    warnings: Vec<Value>,
    refs: Vec<Value>,
) -> Value {
    json!({
        "success": true,
        "intent": intent,
        "result": result,
        "warnings": warnings,
        "refs": refs,
        "error": null
    })
}

pub(crate) fn ai_ok(intent: &str, result: Value) -> Value {
    ai_ok_with_warnings(intent, result, Vec::new(), Vec::new())
}

pub(crate) fn warning(code: &str, message: &str, recovery: &str) -> Value {
    json!({
        "code": code,
        "message": message,
        "recovery": recovery
    })
}

pub(crate) fn ai_error(code: &str, message: &str) -> Value {
    ai_error_with(code, message, None, Vec::new())
}

pub(crate) fn ai_error_with(
    code: &str,
    message: &str,
    recovery: Option<&str>,
    refs: Vec<Value>,
) -> Value {
    let mut error_obj = serde_json::Map::new();
    error_obj.insert("code".to_string(), Value::String(code.to_string()));
    error_obj.insert(
        "message".to_string(),
        Value::String(message.trim().to_string()),
    );
    if let Some(recovery) = recovery {
        error_obj.insert(
            "recovery".to_string(),
            Value::String(recovery.trim().to_string()),
        );
    }

    json!({
        "success": false,
        "intent": "error",
        "result": {},
        "warnings": [],
        "refs": refs,
        "error": Value::Object(error_obj)
    })
}

/// Maps a store failure onto a stable error code plus a recovery hint.
pub(crate) fn store_error(err: StoreError) -> Value {
    let message = err.to_string();
    match &err {
        StoreError::InvalidInput(_) => ai_error("INVALID_INPUT", &message),
        StoreError::UnknownId(kind) => ai_error_with(
            "UNKNOWN_ID",
            &message,
            Some(&format!("List {kind} records to find a valid id.")),
            Vec::new(),
        ),
        StoreError::RevisionMismatch { actual, .. } => ai_error_with(
            "REVISION_MISMATCH",
            &message,
            Some("Reload the record and retry with its current revision."),
            vec![json!({ "current_revision": actual })],
        ),
        StoreError::Transition(TransitionError::InvalidTransition { .. }) => {
            ai_error_with(
                "INVALID_TRANSITION",
                &message,
                Some("Reload the milestone; its status no longer allows this action."),
                Vec::new(),
            )
        }
        StoreError::Transition(_) => ai_error("INVALID_INPUT", &message),
        StoreError::WeightBudgetExceeded { allocated, .. } => ai_error_with(
            "WEIGHT_BUDGET_EXCEEDED",
            &message,
            Some(&format!(
                "At most {} percentage points remain for this project.",
                mt_core::progress::format_percent(100.0 - allocated)
            )),
            Vec::new(),
        ),
        StoreError::EvidenceUpload { failed } => ai_error_with(
            "EVIDENCE_UPLOAD_FAILED",
            &message,
            Some("Nothing was saved. Retry the whole submission."),
            failed.iter().map(|name| json!({ "file_name": name })).collect(),
        ),
        StoreError::Token(_) => ai_error_with(
            "TOKEN_REJECTED",
            &message,
            Some("Ask the project manager for a new portal link."),
            Vec::new(),
        ),
        StoreError::Conflict(_) => ai_error("CONFLICT", &message),
        StoreError::Io(_) | StoreError::Sql(_) => ai_error("STORE_ERROR", &message),
    }
}
