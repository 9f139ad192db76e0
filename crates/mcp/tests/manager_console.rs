#![forbid(unsafe_code)]

mod support;
use support::*;

use serde_json::json;

#[test]
fn project_setup_rolls_weighted_progress_into_the_overview() {
    let mut server = Server::start_initialized("project_setup_rollup");
    let parties = seed_project(&mut server);

    let po = server.call_ok(
        "purchase_orders_create",
        json!({
            "po_number": "PO-2026-0042",
            "project_id": parties.project_id,
            "vendor_id": parties.vendor_id,
            "title": "Structural steel",
            "total_amount": 180000.0,
            "issue_date": "2026-02-01"
        }),
    );
    let po_id = str_at(&po, "/purchase_order/id").to_string();
    assert_eq!(po["purchase_order"]["currency"], "USD");

    let steel = server.call_ok(
        "milestones_create",
        json!({
            "project_id": parties.project_id,
            "purchase_order_id": po_id,
            "name": "Steel delivery",
            "weight_percentage": 60.0,
            "due_date": "2099-03-01"
        }),
    );
    assert_eq!(steel["milestone"]["status"], "pending");
    assert_eq!(steel["milestone"]["evidence_required"], true);
    server.call_ok(
        "milestones_create",
        json!({
            "project_id": parties.project_id,
            "name": "Erection",
            "weight_percentage": 40.0,
            "due_date": "2099-06-01",
            "evidence_required": false
        }),
    );

    let project = server.call_ok(
        "projects_get",
        json!({ "project_id": parties.project_id }),
    );
    assert_eq!(project["project"]["status"], "active");
    assert_eq!(project["client_name"], "Harbor Logistics");
    assert_eq!(project["vendor_name"], "Steelworks Ltd");
    assert_eq!(project["manager_name"], "Dana Okafor");
    assert_eq!(project["progress"]["total_milestones"], 2);
    assert_eq!(project["progress"]["completed_percentage"], 0.0);
    assert_eq!(project["purchase_orders"], 1);
    assert_eq!(project["purchase_order_list"][0]["po_number"], "PO-2026-0042");

    let listed = server.call_ok("projects_list", json!({}));
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["projects"][0]["progress"]["weight_total"], 100.0);

    let plain = server.call_ok("projects_list", json!({ "include_progress": false }));
    assert!(plain["projects"][0].get("progress").is_none());
    assert_eq!(plain["projects"][0]["name"], "Terminal 4 expansion");
}

#[test]
fn weight_budget_is_enforced_per_project() {
    let mut server = Server::start_initialized("weight_budget_enforced");
    let parties = seed_project(&mut server);

    server.call_ok(
        "milestones_create",
        json!({ "project_id": parties.project_id, "name": "Design", "weight_percentage": 70 }),
    );
    let over = server.call(
        "milestones_create",
        json!({ "project_id": parties.project_id, "name": "Build", "weight_percentage": 40 }),
    );
    assert_eq!(error_code(&over), "WEIGHT_BUDGET_EXCEEDED");
    assert!(
        over["error"]["recovery"]
            .as_str()
            .unwrap_or("")
            .contains("30")
    );

    let zero = server.call(
        "milestones_create",
        json!({ "project_id": parties.project_id, "name": "Nothing", "weight_percentage": 0 }),
    );
    assert_eq!(error_code(&zero), "INVALID_INPUT");

    let missing = server.call(
        "milestones_create",
        json!({ "project_id": parties.project_id, "name": "No weight" }),
    );
    assert_eq!(error_code(&missing), "INVALID_INPUT");

    server.call_ok(
        "milestones_create",
        json!({ "project_id": parties.project_id, "name": "Build", "weight_percentage": 30 }),
    );
}

#[test]
fn milestone_templates_prefill_new_milestones() {
    let mut server = Server::start_initialized("milestone_templates_prefill");
    let parties = seed_project(&mut server);

    let survey = server.call_ok(
        "milestone_templates_create",
        json!({
            "name": "Site survey",
            "description": "Survey report accepted by the client",
            "default_weight_percentage": 10,
            "default_evidence_required": false
        }),
    );
    let template_id = str_at(&survey, "/template/id").to_string();
    assert_eq!(template_id, "TPL-001");
    server.call_ok(
        "milestone_templates_create",
        json!({ "name": "Handover", "default_weight_percentage": 20 }),
    );
    let duplicate = server.call(
        "milestone_templates_create",
        json!({ "name": "site survey", "default_weight_percentage": 5 }),
    );
    assert_eq!(error_code(&duplicate), "CONFLICT");

    let listed = server.call_ok("milestone_templates_list", json!({}));
    assert_eq!(listed["count"], 2);
    assert_eq!(listed["templates"][0]["name"], "Handover");
    assert_eq!(listed["templates"][0]["default_evidence_required"], true);
    assert_eq!(listed["templates"][1]["id"], template_id.as_str());

    let ms = server.call_ok(
        "milestones_create",
        json!({
            "project_id": parties.project_id,
            "template_id": template_id,
            "due_date": "2099-02-01"
        }),
    );
    assert_eq!(ms["milestone"]["name"], "Site survey");
    assert_eq!(ms["milestone"]["description"], "Survey report accepted by the client");
    assert_eq!(ms["milestone"]["weight_percentage"], 10.0);
    assert_eq!(ms["milestone"]["evidence_required"], false);
    assert_eq!(ms["milestone"]["template_id"], template_id.as_str());

    let unknown = server.call(
        "milestones_create",
        json!({ "project_id": parties.project_id, "template_id": "TPL-099" }),
    );
    assert_eq!(error_code(&unknown), "UNKNOWN_ID");
}

#[test]
fn overdue_is_derived_from_the_evaluation_date() {
    let mut server = Server::start_initialized("overdue_is_derived");
    let parties = seed_project(&mut server);
    let ms = server.call_ok(
        "milestones_create",
        json!({
            "project_id": parties.project_id,
            "name": "Site survey",
            "weight_percentage": 10,
            "due_date": "2026-03-31"
        }),
    );
    let ms_id = str_at(&ms, "/milestone/id").to_string();

    let before = server.call_ok(
        "milestones_list",
        json!({ "project_id": parties.project_id, "as_of": "2026-03-31" }),
    );
    assert_eq!(before["milestones"][0]["display_status"], "pending");
    assert_eq!(before["milestones"][0]["is_overdue"], false);

    let after_payload = server.call(
        "milestones_list",
        json!({ "project_id": parties.project_id, "as_of": "2026-04-01" }),
    );
    assert_eq!(after_payload["success"], true);
    let after = &after_payload["result"];
    assert_eq!(after["milestones"][0]["display_status"], "overdue");
    assert_eq!(after["milestones"][0]["status"], "pending");
    assert_eq!(after["milestones"][0]["project_name"], "Terminal 4 expansion");
    assert_eq!(after_payload["warnings"][0]["code"], "MILESTONES_OVERDUE");

    let only_overdue = server.call_ok(
        "milestones_list",
        json!({ "status": "overdue", "as_of": "2026-04-01" }),
    );
    assert_eq!(only_overdue["count"], 1);
    assert_eq!(only_overdue["milestones"][0]["id"], ms_id.as_str());

    let overview = server.call_ok(
        "projects_get",
        json!({ "project_id": parties.project_id, "as_of": "2026-04-01" }),
    );
    assert_eq!(overview["progress"]["overdue_milestones"], 1);

    let bad_date = server.call("milestones_list", json!({ "as_of": "01/04/2026" }));
    assert_eq!(error_code(&bad_date), "INVALID_INPUT");
}

#[test]
fn project_status_changes_honour_revisions() {
    let mut server = Server::start_initialized("project_status_revisions");
    let parties = seed_project(&mut server);
    let project = server.call_ok("projects_get", json!({ "project_id": parties.project_id }));
    let revision = project["project"]["revision"].as_i64().expect("revision");

    let held = server.call_ok(
        "projects_set_status",
        json!({ "project_id": parties.project_id, "status": "on_hold", "expected_revision": revision }),
    );
    assert_eq!(held["project"]["status"], "on_hold");

    let stale = server.call(
        "projects_set_status",
        json!({ "project_id": parties.project_id, "status": "active", "expected_revision": revision }),
    );
    assert_eq!(error_code(&stale), "REVISION_MISMATCH");
    assert_eq!(stale["refs"][0]["current_revision"], revision + 1);

    let filtered = server.call_ok("projects_list", json!({ "status": "on_hold" }));
    assert_eq!(filtered["count"], 1);
    let none = server.call_ok("projects_list", json!({ "status": "cancelled" }));
    assert_eq!(none["count"], 0);
}

#[test]
fn directory_rejects_duplicates_and_non_manager_project_leads() {
    let mut server = Server::start_initialized("directory_rules");
    let parties = seed_project(&mut server);

    let dup = server.call(
        "users_create",
        json!({
            "email": "PM@Harbor.Example",
            "first_name": "Dana",
            "last_name": "Twin",
            "role": "admin"
        }),
    );
    assert_eq!(error_code(&dup), "CONFLICT");

    let vendor_user = server.call_ok(
        "users_create",
        json!({
            "email": "site@steelworks.example",
            "first_name": "Sam",
            "last_name": "Reyes",
            "role": "vendor",
            "organization_id": parties.vendor_id
        }),
    );
    let lead = server.call(
        "projects_create",
        json!({
            "name": "Depot",
            "client_id": parties.client_id,
            "project_manager_id": str_at(&vendor_user, "/user/id")
        }),
    );
    assert_eq!(error_code(&lead), "INVALID_INPUT");

    let vendors = server.call_ok("organizations_list", json!({ "org_type": "vendor" }));
    assert_eq!(vendors["count"], 1);
    assert_eq!(vendors["organizations"][0]["name"], "Steelworks Ltd");
}

#[test]
fn schedules_keep_activity_order_and_inclusive_durations() {
    let mut server = Server::start_initialized("schedules_order");
    let parties = seed_project(&mut server);

    let created = server.call_ok(
        "schedules_create",
        json!({
            "project_id": parties.project_id,
            "name": "Baseline",
            "start_date": "2026-11-01",
            "end_date": "2026-12-31",
            "activities": [
                { "name": "Mobilise", "start_date": "2026-11-02", "end_date": "2026-11-02" },
                {
                    "name": "Steel erection",
                    "activity_type": "summary",
                    "start_date": "2026-11-03",
                    "end_date": "2026-12-02",
                    "progress_percentage": 100
                }
            ]
        }),
    );
    let activities = &created["schedule"]["activities"];
    assert_eq!(created["schedule"]["status"], "draft");
    assert_eq!(activities[0]["ordinal"], 1);
    assert_eq!(activities[0]["duration_days"], 1);
    assert_eq!(activities[0]["activity_type"], "task");
    assert_eq!(activities[0]["status"], "not_started");
    assert_eq!(activities[1]["duration_days"], 30);
    assert_eq!(activities[1]["status"], "completed");

    let listed = server.call_ok("schedules_list", json!({ "project_id": parties.project_id }));
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["schedules"][0]["activities"][1]["name"], "Steel erection");

    let bad = server.call(
        "schedules_create",
        json!({ "project_id": parties.project_id, "name": "Broken", "activities": ["Mobilise"] }),
    );
    assert_eq!(error_code(&bad), "INVALID_INPUT");
}

#[test]
fn analytics_summarise_portfolio_and_vendors() {
    let mut server = Server::start_initialized("analytics_summary");
    let parties = seed_project(&mut server);
    server.call_ok(
        "milestones_create",
        json!({ "project_id": parties.project_id, "name": "Design", "weight_percentage": 50 }),
    );

    let summary = server.call_ok("analytics_summary", json!({ "months": 3 }));
    assert_eq!(summary["portfolio"]["total_projects"], 1);
    assert_eq!(summary["portfolio"]["total_budget"], 250000.0);
    assert_eq!(summary["portfolio"]["total_milestones"], 1);
    let months = summary["months"].as_array().expect("months");
    assert_eq!(months.len(), 3);
    assert_eq!(months[2]["projects"], 1);

    let too_many = server.call("analytics_summary", json!({ "months": 25 }));
    assert_eq!(error_code(&too_many), "INVALID_INPUT");

    let vendors = server.call_ok("analytics_vendors", json!({}));
    assert_eq!(vendors["vendors"][0]["vendor_name"], "Steelworks Ltd");
    assert_eq!(vendors["vendors"][0]["total_milestones"], 1);
}
