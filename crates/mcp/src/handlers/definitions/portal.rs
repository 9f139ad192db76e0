#![forbid(unsafe_code)]

use serde_json::{Value, json};

fn token() -> Value {
    json!({ "type": "string", "description": "Vendor portal token issued by the project manager." })
}

pub(super) fn portal_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "portal_open",
            "description": "Vendor view of the token's project and its milestones.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "token": token(),
                    "as_of": { "type": "string" }
                },
                "required": ["token"]
            }
        }),
        json!({
            "name": "portal_notes",
            "description": "Overwrite the vendor notes of a milestone.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "token": token(),
                    "milestone_id": { "type": "string" },
                    "notes": { "type": "string" }
                },
                "required": ["token", "milestone_id", "notes"]
            }
        }),
        json!({
            "name": "portal_progress",
            "description": "Report completion (0-100) on an open milestone; 100 marks it completed.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "token": token(),
                    "milestone_id": { "type": "string" },
                    "completion_percentage": { "type": "number" },
                    "expected_revision": { "type": "integer" }
                },
                "required": ["token", "milestone_id", "completion_percentage"]
            }
        }),
        json!({
            "name": "portal_submit",
            "description": "Upload evidence and submit a milestone for review. All files are stored or none are.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "token": token(),
                    "milestone_id": { "type": "string" },
                    "notes": { "type": "string" },
                    "expected_revision": { "type": "integer" },
                    "files": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "file_name": { "type": "string" },
                                "mime_type": { "type": "string" },
                                "description": { "type": "string" },
                                "content_base64": { "type": "string" }
                            },
                            "required": ["file_name", "content_base64"]
                        }
                    }
                },
                "required": ["token", "milestone_id"]
            }
        }),
    ]
}
