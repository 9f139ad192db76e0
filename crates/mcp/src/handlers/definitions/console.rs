#![forbid(unsafe_code)]

use serde_json::{Value, json};

fn as_of() -> Value {
    json!({ "type": "string", "description": "Evaluation date YYYY-MM-DD; defaults to today (UTC)." })
}

fn expected_revision() -> Value {
    json!({ "type": "integer", "description": "Refuse the change unless the record is still at this revision." })
}

pub(super) fn console_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "organizations_create",
            "description": "Register a client, vendor, contractor or consultant organisation.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "org_type": { "type": "string", "enum": ["client", "vendor", "contractor", "consultant"] },
                    "country": { "type": "string" },
                    "address": { "type": "string" },
                    "contact_email": { "type": "string" },
                    "contact_phone": { "type": "string" },
                    "tax_id": { "type": "string" }
                },
                "required": ["name", "org_type"]
            }
        }),
        json!({
            "name": "organizations_list",
            "description": "List organisations, optionally by type.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "org_type": { "type": "string", "enum": ["client", "vendor", "contractor", "consultant"] },
                    "limit": { "type": "integer" },
                    "offset": { "type": "integer" }
                },
                "required": []
            }
        }),
        json!({
            "name": "users_create",
            "description": "Create a user profile. Only admins and project managers may manage projects or review milestones.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "email": { "type": "string" },
                    "first_name": { "type": "string" },
                    "last_name": { "type": "string" },
                    "role": { "type": "string", "enum": ["admin", "project_manager", "vendor", "client", "consultant"] },
                    "organization_id": { "type": "string" }
                },
                "required": ["email", "first_name", "last_name", "role"]
            }
        }),
        json!({
            "name": "projects_create",
            "description": "Create a project in status planning.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "description": { "type": "string" },
                    "client_id": { "type": "string" },
                    "project_manager_id": { "type": "string" },
                    "vendor_id": { "type": "string" },
                    "start_date": { "type": "string" },
                    "end_date": { "type": "string" },
                    "budget": { "type": "number" },
                    "currency": { "type": "string" }
                },
                "required": ["name", "client_id", "project_manager_id"]
            }
        }),
        json!({
            "name": "projects_list",
            "description": "List projects, newest first, with weighted progress unless include_progress=false.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "status": { "type": "string", "enum": ["planning", "active", "on_hold", "completed", "cancelled"] },
                    "include_progress": { "type": "boolean" },
                    "limit": { "type": "integer" },
                    "offset": { "type": "integer" },
                    "as_of": as_of()
                },
                "required": []
            }
        }),
        json!({
            "name": "projects_get",
            "description": "Project overview: parties, progress rollup and purchase orders.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "project_id": { "type": "string" },
                    "as_of": as_of()
                },
                "required": ["project_id"]
            }
        }),
        json!({
            "name": "projects_set_status",
            "description": "Change a project's status.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "project_id": { "type": "string" },
                    "status": { "type": "string", "enum": ["planning", "active", "on_hold", "completed", "cancelled"] },
                    "expected_revision": expected_revision()
                },
                "required": ["project_id", "status"]
            }
        }),
        json!({
            "name": "purchase_orders_create",
            "description": "Issue a purchase order to a vendor under a project. PO numbers are unique.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "po_number": { "type": "string" },
                    "project_id": { "type": "string" },
                    "vendor_id": { "type": "string" },
                    "title": { "type": "string" },
                    "description": { "type": "string" },
                    "total_amount": { "type": "number" },
                    "currency": { "type": "string" },
                    "issue_date": { "type": "string" },
                    "expected_delivery_date": { "type": "string" }
                },
                "required": ["po_number", "project_id", "vendor_id", "title", "total_amount"]
            }
        }),
        json!({
            "name": "purchase_orders_list",
            "description": "List purchase orders, optionally for one project.",
            "inputSchema": {
                "type": "object",
                "properties": { "project_id": { "type": "string" } },
                "required": []
            }
        }),
        json!({
            "name": "milestone_templates_create",
            "description": "Save a reusable milestone template with a default weight and evidence flag. Names are unique.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "description": { "type": "string" },
                    "default_weight_percentage": { "type": "number" },
                    "default_evidence_required": { "type": "boolean" }
                },
                "required": ["name", "default_weight_percentage"]
            }
        }),
        json!({
            "name": "milestone_templates_list",
            "description": "All milestone templates, ordered by name.",
            "inputSchema": { "type": "object", "properties": {}, "required": [] }
        }),
        json!({
            "name": "milestones_create",
            "description": "Create a pending milestone. With template_id, omitted name, description, weight_percentage and evidence_required come from the template. Weights of one project may not sum past 100.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "project_id": { "type": "string" },
                    "purchase_order_id": { "type": "string" },
                    "template_id": { "type": "string" },
                    "name": { "type": "string" },
                    "description": { "type": "string" },
                    "weight_percentage": { "type": "number" },
                    "due_date": { "type": "string" },
                    "evidence_required": { "type": "boolean" }
                },
                "required": ["project_id"]
            }
        }),
        json!({
            "name": "milestones_list",
            "description": "Milestone progress view, ordered by due date. status matches the stored or the displayed status; overdue is derived.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "project_id": { "type": "string" },
                    "status": {
                        "type": "string",
                        "enum": ["pending", "in_progress", "completed", "pending_completion_review", "approved", "rejected", "overdue"]
                    },
                    "as_of": as_of()
                },
                "required": []
            }
        }),
        json!({
            "name": "milestones_get",
            "description": "One milestone with its evidence.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "milestone_id": { "type": "string" },
                    "as_of": as_of()
                },
                "required": ["milestone_id"]
            }
        }),
        json!({
            "name": "milestones_approve",
            "description": "Approve a milestone awaiting review; completion becomes 100.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "milestone_id": { "type": "string" },
                    "reviewed_by": { "type": "string" },
                    "expected_revision": expected_revision()
                },
                "required": ["milestone_id"]
            }
        }),
        json!({
            "name": "milestones_reject",
            "description": "Reject a milestone awaiting review with a non-empty reason; completion becomes 0.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "milestone_id": { "type": "string" },
                    "reason": { "type": "string" },
                    "reviewed_by": { "type": "string" },
                    "expected_revision": expected_revision()
                },
                "required": ["milestone_id", "reason"]
            }
        }),
        json!({
            "name": "milestones_events",
            "description": "Audit trail of a milestone's lifecycle, oldest first.",
            "inputSchema": {
                "type": "object",
                "properties": { "milestone_id": { "type": "string" } },
                "required": ["milestone_id"]
            }
        }),
        json!({
            "name": "evidence_list",
            "description": "Evidence files attached to a milestone, with public URLs.",
            "inputSchema": {
                "type": "object",
                "properties": { "milestone_id": { "type": "string" } },
                "required": ["milestone_id"]
            }
        }),
        json!({
            "name": "schedules_create",
            "description": "Create a draft project schedule with ordered activities.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "project_id": { "type": "string" },
                    "name": { "type": "string" },
                    "description": { "type": "string" },
                    "start_date": { "type": "string" },
                    "end_date": { "type": "string" },
                    "activities": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "description": { "type": "string" },
                                "activity_type": { "type": "string", "enum": ["task", "milestone", "summary"] },
                                "start_date": { "type": "string" },
                                "end_date": { "type": "string" },
                                "progress_percentage": { "type": "number" },
                                "status": { "type": "string", "enum": ["not_started", "in_progress", "completed"] }
                            },
                            "required": ["name"]
                        }
                    }
                },
                "required": ["project_id", "name"]
            }
        }),
        json!({
            "name": "schedules_list",
            "description": "Schedules of a project with their activities.",
            "inputSchema": {
                "type": "object",
                "properties": { "project_id": { "type": "string" } },
                "required": ["project_id"]
            }
        }),
        json!({
            "name": "analytics_summary",
            "description": "Portfolio totals and project intake per month.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "months": { "type": "integer", "description": "Months of history, 1-24 (default 6)." },
                    "as_of": as_of()
                },
                "required": []
            }
        }),
        json!({
            "name": "analytics_vendors",
            "description": "Milestone outcomes per vendor organisation.",
            "inputSchema": {
                "type": "object",
                "properties": { "as_of": as_of() },
                "required": []
            }
        }),
        json!({
            "name": "portal_issue",
            "description": "Issue a signed vendor portal token for one project.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "project_id": { "type": "string" },
                    "ttl_days": { "type": "integer" }
                },
                "required": ["project_id"]
            }
        }),
        json!({
            "name": "portal_revoke",
            "description": "Revoke a vendor portal token.",
            "inputSchema": {
                "type": "object",
                "properties": { "token_id": { "type": "string" } },
                "required": ["token_id"]
            }
        }),
        json!({
            "name": "portal_tokens",
            "description": "Portal tokens issued for a project and their state.",
            "inputSchema": {
                "type": "object",
                "properties": { "project_id": { "type": "string" } },
                "required": ["project_id"]
            }
        }),
    ]
}
