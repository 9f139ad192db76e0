#![forbid(unsafe_code)]

mod console;
mod portal;

use serde_json::Value;

pub(crate) fn tool_definitions() -> Vec<Value> {
    let mut tools = Vec::new();
    tools.extend(console::console_definitions());
    tools.extend(portal::portal_definitions());
    tools.sort_by_key(|tool| {
        tool.get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    });
    tools
}
