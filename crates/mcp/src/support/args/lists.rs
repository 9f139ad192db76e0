#![forbid(unsafe_code)]

use super::super::ai::ai_error;
use super::Args;
use serde_json::Value;

/// An optional array whose items must all be objects.
pub(crate) fn optional_object_list<'a>(args: &'a Args, key: &str) -> Result<Vec<&'a Args>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(Vec::new());
    };
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        _ => {
            return Err(ai_error(
                "INVALID_INPUT",
                &format!("{key} must be an array of objects"),
            ));
        }
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_object().ok_or_else(|| {
                ai_error(
                    "INVALID_INPUT",
                    &format!("{key}[{index}] must be an object"),
                )
            })
        })
        .collect()
}
