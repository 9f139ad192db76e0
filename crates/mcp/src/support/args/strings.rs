#![forbid(unsafe_code)]

use super::super::ai::ai_error;
use super::Args;
use mt_core::dates::CalendarDate;
use serde_json::Value;

pub(crate) fn require_string(args: &Args, key: &str) -> Result<String, Value> {
    let Some(v) = args.get(key).and_then(|v| v.as_str()) else {
        return Err(ai_error("INVALID_INPUT", &format!("{key} is required")));
    };
    Ok(v.to_string())
}

pub(crate) fn optional_string(args: &Args, key: &str) -> Result<Option<String>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::String(v) => Ok(Some(v.to_string())),
        _ => Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must be a string"),
        )),
    }
}

/// Parses one of the labels of a string enum, e.g. `status=approved`.
pub(crate) fn optional_label<T>(
    args: &Args,
    key: &str,
    parse: fn(&str) -> Option<T>,
    labels: fn() -> String,
) -> Result<Option<T>, Value> {
    let Some(raw) = optional_string(args, key)? else {
        return Ok(None);
    };
    parse(&raw).map(Some).ok_or_else(|| {
        ai_error(
            "INVALID_INPUT",
            &format!("{key} must be one of: {}", labels()),
        )
    })
}

pub(crate) fn require_label<T>(
    args: &Args,
    key: &str,
    parse: fn(&str) -> Option<T>,
    labels: fn() -> String,
) -> Result<T, Value> {
    optional_label(args, key, parse, labels)?
        .ok_or_else(|| ai_error("INVALID_INPUT", &format!("{key} is required")))
}

/// Reads an optional `YYYY-MM-DD` date, falling back to `default`.
pub(crate) fn date_or(args: &Args, key: &str, default: CalendarDate) -> Result<CalendarDate, Value> {
    match optional_string(args, key)? {
        None => Ok(default),
        Some(raw) => CalendarDate::parse(&raw)
            .map_err(|_| ai_error("INVALID_INPUT", &format!("{key} must be YYYY-MM-DD"))),
    }
}
