#![forbid(unsafe_code)]

use super::super::ai::ai_error;
use super::Args;
use serde_json::Value;

/// Reads a boolean flag. Absent or `null` yields `None` so callers can fall
/// back to a template default before a hard-coded one.
pub(crate) fn optional_flag(args: &Args, key: &str) -> Result<Option<bool>, Value> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(v)) => Ok(Some(*v)),
        Some(Value::String(s)) if s == "true" || s == "false" => Ok(Some(s == "true")),
        Some(_) => Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must be a boolean"),
        )),
    }
}

pub(crate) fn flag_or(args: &Args, key: &str, default: bool) -> Result<bool, Value> {
    Ok(optional_flag(args, key)?.unwrap_or(default))
}
