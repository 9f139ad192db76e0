#![forbid(unsafe_code)]

use super::super::StoreError;
use mt_core::dates::CalendarDate;
use mt_core::ids::{RecordId, RecordKind};
use rusqlite::ErrorCode;

pub(in crate::store) const DEFAULT_CURRENCY: &str = "USD";

pub(in crate::store) fn required_text(
    value: &str,
    message: &'static str,
) -> Result<String, StoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StoreError::InvalidInput(message));
    }
    Ok(value.to_string())
}

pub(in crate::store) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(in crate::store) fn optional_date(
    value: Option<&str>,
    message: &'static str,
) -> Result<Option<CalendarDate>, StoreError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => CalendarDate::parse(raw)
            .map(Some)
            .map_err(|_| StoreError::InvalidInput(message)),
    }
}

pub(in crate::store) fn record_id(
    kind: RecordKind,
    value: &str,
    message: &'static str,
) -> Result<String, StoreError> {
    RecordId::parse(kind, value)
        .map(RecordId::into_string)
        .map_err(|_| StoreError::InvalidInput(message))
}

pub(in crate::store) fn optional_record_id(
    kind: RecordKind,
    value: Option<&str>,
    message: &'static str,
) -> Result<Option<String>, StoreError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| record_id(kind, v, message))
        .transpose()
}

pub(in crate::store) fn amount(value: f64, message: &'static str) -> Result<f64, StoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(StoreError::InvalidInput(message));
    }
    Ok(value)
}

/// A single milestone weight: greater than 0 and at most 100.
pub(in crate::store) fn milestone_weight(value: f64, field: &'static str) -> Result<f64, StoreError> {
    if !value.is_finite() || value <= 0.0 || value > mt_core::progress::WEIGHT_BUDGET {
        return Err(StoreError::InvalidInput(field));
    }
    Ok(value)
}

pub(in crate::store) fn currency(value: Option<String>) -> Result<String, StoreError> {
    let Some(value) = optional_text(value) else {
        return Ok(DEFAULT_CURRENCY.to_string());
    };
    if value.len() != 3 || !value.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(StoreError::InvalidInput(
            "currency must be a three-letter code",
        ));
    }
    Ok(value.to_ascii_uppercase())
}

pub(in crate::store) fn check_revision(
    expected: Option<i64>,
    actual: i64,
) -> Result<(), StoreError> {
    if let Some(expected) = expected
        && expected != actual
    {
        return Err(StoreError::RevisionMismatch { expected, actual });
    }
    Ok(())
}

pub(in crate::store) fn to_sqlite_i64(value: usize) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| StoreError::InvalidInput("numeric overflow"))
}

pub(in crate::store) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.code == ErrorCode::ConstraintViolation
                && message
                    .as_deref()
                    .is_some_and(|value| value.contains("UNIQUE constraint failed"))
        }
        _ => false,
    }
}
