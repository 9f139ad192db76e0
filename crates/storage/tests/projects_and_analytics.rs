#![forbid(unsafe_code)]

mod support;

use mt_core::dates::CalendarDate;
use mt_core::model::{
    ActivityStatus, ActivityType, MilestoneStatus, OrganizationType, ProjectStatus, ScheduleStatus,
    UserRole,
};
use mt_storage::{
    ApproveMilestoneRequest, CreateMilestoneRequest, CreatePurchaseOrderRequest,
    CreateScheduleRequest, CreateUserRequest, ListMilestonesRequest, ListOrganizationsRequest,
    ListProjectsRequest, NewActivity, ReportProgressRequest, SetProjectStatusRequest, SqliteStore,
    StoreError, SubmitForReviewRequest,
};
use support::*;

fn today() -> CalendarDate {
    CalendarDate::from_unix_ms(NOW_MS)
}

fn progress(store: &mut SqliteStore, milestone_id: &str, value: f64) {
    store
        .report_progress(ReportProgressRequest {
            milestone_id: milestone_id.to_string(),
            completion_percentage: value,
            expected_revision: None,
            reported_by: "vendor-portal".to_string(),
            now_ms: NOW_MS,
        })
        .expect("report progress");
}

fn submit_and_approve(store: &mut SqliteStore, milestone_id: &str) {
    store
        .submit_for_review(SubmitForReviewRequest {
            milestone_id: milestone_id.to_string(),
            files: vec![upload("proof.pdf", b"proof")],
            notes: None,
            uploaded_by: "vendor-portal".to_string(),
            expected_revision: None,
            now_ms: NOW_MS,
        })
        .expect("submit");
    store
        .approve_milestone(ApproveMilestoneRequest {
            milestone_id: milestone_id.to_string(),
            expected_revision: None,
            reviewed_by: None,
            now_ms: NOW_MS,
        })
        .expect("approve");
}

#[test]
fn first_milestone_activates_a_planning_project() {
    let dir = temp_dir("first_milestone_activates");
    let mut store = SqliteStore::open(&dir).expect("open store");
    let fx = seed(&mut store);
    assert_eq!(
        store.get_project(&fx.project_id).expect("project").status,
        ProjectStatus::Planning
    );

    milestone(&mut store, &fx.project_id, "Design sign-off", 10.0, "2026-11-01");
    assert_eq!(
        store.get_project(&fx.project_id).expect("project").status,
        ProjectStatus::Active
    );

    let held = store
        .set_project_status(SetProjectStatusRequest {
            project_id: fx.project_id.clone(),
            status: ProjectStatus::OnHold,
            expected_revision: None,
            now_ms: NOW_MS,
        })
        .expect("hold");
    milestone(&mut store, &fx.project_id, "Procurement", 10.0, "2026-11-15");
    assert_eq!(
        store.get_project(&fx.project_id).expect("project").status,
        ProjectStatus::OnHold
    );

    let err = store
        .set_project_status(SetProjectStatusRequest {
            project_id: fx.project_id.clone(),
            status: ProjectStatus::Active,
            expected_revision: Some(held.revision - 1),
            now_ms: NOW_MS,
        })
        .expect_err("stale project revision");
    assert!(matches!(err, StoreError::RevisionMismatch { .. }), "{err:?}");
}

#[test]
fn milestone_weights_may_not_exceed_one_hundred() {
    let dir = temp_dir("weight_budget");
    let mut store = SqliteStore::open(&dir).expect("open store");
    let fx = seed(&mut store);
    milestone(&mut store, &fx.project_id, "A", 60.0, "2026-11-01");
    milestone(&mut store, &fx.project_id, "B", 30.0, "2026-11-01");

    let err = store
        .create_milestone(CreateMilestoneRequest {
            project_id: fx.project_id.clone(),
            purchase_order_id: None,
            template_id: None,
            name: "C".to_string(),
            description: None,
            weight_percentage: Some(20.0),
            due_date: None,
            evidence_required: Some(false),
            now_ms: NOW_MS,
        })
        .expect_err("budget exceeded");
    assert!(
        matches!(err, StoreError::WeightBudgetExceeded { allocated, requested } if allocated == 90.0 && requested == 20.0),
        "{err:?}"
    );
    milestone(&mut store, &fx.project_id, "C", 10.0, "2026-11-01");

    for weight in [0.0, -5.0, 100.5, f64::NAN] {
        let err = store
            .create_milestone(CreateMilestoneRequest {
                project_id: fx.project_id.clone(),
                purchase_order_id: None,
                template_id: None,
                name: "bad".to_string(),
                description: None,
                weight_percentage: Some(weight),
                due_date: None,
                evidence_required: Some(false),
                now_ms: NOW_MS,
            })
            .expect_err("invalid weight");
        assert!(matches!(err, StoreError::InvalidInput(_)), "{weight}: {err:?}");
    }
}

#[test]
fn milestones_can_only_reference_purchase_orders_of_their_project() {
    let dir = temp_dir("po_same_project");
    let mut store = SqliteStore::open(&dir).expect("open store");
    let fx = seed(&mut store);
    let other = store
        .create_project(mt_storage::CreateProjectRequest {
            name: "Depot".to_string(),
            description: None,
            client_id: fx.client_id.clone(),
            project_manager_id: fx.manager_id.clone(),
            vendor_id: None,
            start_date: None,
            end_date: None,
            budget: None,
            currency: None,
            now_ms: NOW_MS,
        })
        .expect("second project");

    let err = store
        .create_milestone(CreateMilestoneRequest {
            project_id: other.id.clone(),
            purchase_order_id: Some(fx.purchase_order_id.clone()),
            template_id: None,
            name: "Crossed".to_string(),
            description: None,
            weight_percentage: Some(10.0),
            due_date: None,
            evidence_required: Some(false),
            now_ms: NOW_MS,
        })
        .expect_err("foreign purchase order");
    assert!(matches!(err, StoreError::InvalidInput(_)), "{err:?}");
}

#[test]
fn overview_rolls_up_weighted_completion_and_derived_overdue() {
    let dir = temp_dir("overview_rollup");
    let mut store = SqliteStore::open(&dir).expect("open store");
    let fx = seed(&mut store);
    let a = milestone(&mut store, &fx.project_id, "Steel delivery", 50.0, "2026-10-10");
    let b = milestone(&mut store, &fx.project_id, "Erection", 30.0, "2026-12-01");
    let c = milestone(&mut store, &fx.project_id, "Snagging", 20.0, "2026-10-01");
    submit_and_approve(&mut store, &a.id);
    progress(&mut store, &b.id, 50.0);

    let overview = store
        .project_overview(&fx.project_id, today())
        .expect("overview");
    assert_eq!(overview.client_name, "Harbor Logistics");
    assert_eq!(overview.vendor_name.as_deref(), Some("Steelworks Ltd"));
    assert_eq!(overview.manager_name, "Dana Okafor");
    assert_eq!(overview.purchase_orders, 1);
    assert_eq!(overview.rollup.total_milestones, 3);
    assert_eq!(overview.rollup.approved_milestones, 1);
    assert_eq!(overview.rollup.overdue_milestones, 1);
    assert!((overview.rollup.completed_percentage - 65.0).abs() < 1e-9);

    // Overdue is derived on read; the stored status stays pending.
    assert_eq!(
        store.get_milestone(&c.id).expect("get").status,
        MilestoneStatus::Pending
    );
    let overdue = store
        .list_milestones(ListMilestonesRequest {
            project_id: Some(fx.project_id.clone()),
            status: Some(MilestoneStatus::Overdue),
            today: today(),
        })
        .expect("list overdue");
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].milestone.id, c.id);
    assert!(overdue[0].is_overdue);

    let all = store
        .list_milestones(ListMilestonesRequest {
            project_id: None,
            status: None,
            today: today(),
        })
        .expect("list all");
    let order = all.iter().map(|row| row.milestone.id.clone()).collect::<Vec<_>>();
    assert_eq!(order, vec![c.id.clone(), a.id.clone(), b.id.clone()]);
    assert_eq!(all[1].evidence_count, 1);
    assert_eq!(all[1].project_name, "Terminal 4 expansion");
    assert_eq!(all[1].display_status, MilestoneStatus::Approved);

    let overviews = store
        .list_project_overviews(Some(ProjectStatus::Active), today())
        .expect("overviews");
    assert_eq!(overviews.len(), 1);
    assert_eq!(overviews[0], overview);
}

#[test]
fn analytics_summarise_portfolio_months_and_vendors() {
    let dir = temp_dir("analytics");
    let mut store = SqliteStore::open(&dir).expect("open store");
    let fx = seed(&mut store);

    let electrics = store
        .create_organization(organization("Volt Electrical", OrganizationType::Contractor))
        .expect("second vendor");
    let po = store
        .create_purchase_order(CreatePurchaseOrderRequest {
            po_number: "PO-2026-0043".to_string(),
            project_id: fx.project_id.clone(),
            vendor_id: electrics.id.clone(),
            title: "Electrical fit-out".to_string(),
            description: None,
            total_amount: 40_000.0,
            currency: None,
            issue_date: None,
            expected_delivery_date: None,
            now_ms: NOW_MS,
        })
        .expect("second po");

    let steel = milestone(&mut store, &fx.project_id, "Steel delivery", 50.0, "2026-12-01");
    let wiring = store
        .create_milestone(CreateMilestoneRequest {
            project_id: fx.project_id.clone(),
            purchase_order_id: Some(po.id.clone()),
            template_id: None,
            name: "Wiring".to_string(),
            description: None,
            weight_percentage: Some(50.0),
            due_date: Some("2026-09-30".to_string()),
            evidence_required: Some(false),
            now_ms: NOW_MS,
        })
        .expect("wiring milestone");
    submit_and_approve(&mut store, &steel.id);

    let summary = store.analytics_summary(today(), 6).expect("summary");
    assert_eq!(summary.portfolio.total_projects, 1);
    assert_eq!(summary.portfolio.total_milestones, 2);
    assert_eq!(summary.portfolio.total_purchase_orders, 2);
    assert_eq!(summary.portfolio.overdue_milestones, 1);
    assert_eq!(summary.portfolio.total_budget, 250_000.0);
    assert!((summary.portfolio.completion_rate - 50.0).abs() < 1e-9);
    assert_eq!(summary.months.len(), 6);
    let last = summary.months.last().expect("current month");
    assert_eq!(last.label, "Oct 2026");
    assert_eq!(last.projects, 1);
    assert_eq!(summary.months[0].label, "May 2026");
    assert_eq!(summary.months[0].projects, 0);

    let vendors = store.vendor_performance(today()).expect("vendors");
    assert_eq!(vendors.len(), 2);
    let steelworks = vendors
        .iter()
        .find(|row| row.performance.vendor_id == fx.vendor_id)
        .expect("steelworks row");
    assert_eq!(steelworks.vendor_name, "Steelworks Ltd");
    assert_eq!(steelworks.performance.approved_milestones, 1);
    assert_eq!(steelworks.performance.average_completion, 100.0);
    let volt = vendors
        .iter()
        .find(|row| row.performance.vendor_id == electrics.id)
        .expect("volt row");
    assert_eq!(volt.performance.total_milestones, 1);
    assert_eq!(volt.performance.overdue_milestones, 1);
    assert_eq!(store.get_milestone(&wiring.id).expect("get").purchase_order_id, Some(po.id));
}

#[test]
fn directory_validates_and_normalises_records() {
    let dir = temp_dir("directory");
    let mut store = SqliteStore::open(&dir).expect("open store");
    let fx = seed(&mut store);

    let err = store
        .create_user(CreateUserRequest {
            email: "PM@Harbor.Example".to_string(),
            first_name: "Dup".to_string(),
            last_name: "Licate".to_string(),
            role: UserRole::Admin,
            organization_id: None,
            now_ms: NOW_MS,
        })
        .expect_err("duplicate email");
    assert!(matches!(err, StoreError::Conflict(_)), "{err:?}");

    let vendors = store
        .list_organizations(ListOrganizationsRequest {
            org_type: Some(OrganizationType::Vendor),
            limit: 10,
            offset: 0,
        })
        .expect("vendors");
    assert_eq!(vendors.len(), 1);
    assert_eq!(vendors[0].id, fx.vendor_id);

    let err = store
        .create_project(mt_storage::CreateProjectRequest {
            name: "Backwards".to_string(),
            description: None,
            client_id: fx.client_id.clone(),
            project_manager_id: fx.vendor_user_id.clone(),
            vendor_id: None,
            start_date: None,
            end_date: None,
            budget: None,
            currency: None,
            now_ms: NOW_MS,
        })
        .expect_err("vendor users cannot manage projects");
    assert!(matches!(err, StoreError::InvalidInput(_)), "{err:?}");

    let err = store
        .create_project(mt_storage::CreateProjectRequest {
            name: "Backwards".to_string(),
            description: None,
            client_id: fx.client_id.clone(),
            project_manager_id: fx.manager_id.clone(),
            vendor_id: None,
            start_date: Some("2026-05-01".to_string()),
            end_date: Some("2026-04-01".to_string()),
            budget: None,
            currency: None,
            now_ms: NOW_MS,
        })
        .expect_err("end before start");
    assert!(matches!(err, StoreError::InvalidInput(_)), "{err:?}");

    let err = store
        .create_purchase_order(CreatePurchaseOrderRequest {
            po_number: "PO-2026-0042".to_string(),
            project_id: fx.project_id.clone(),
            vendor_id: fx.vendor_id.clone(),
            title: "Duplicate".to_string(),
            description: None,
            total_amount: 1.0,
            currency: None,
            issue_date: None,
            expected_delivery_date: None,
            now_ms: NOW_MS,
        })
        .expect_err("duplicate po number");
    assert!(matches!(err, StoreError::Conflict(_)), "{err:?}");

    let projects = store
        .list_projects(ListProjectsRequest {
            status: None,
            limit: 10,
            offset: 0,
        })
        .expect("projects");
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].currency, "USD");
    assert_eq!(
        store.list_purchase_orders(Some(&fx.project_id)).expect("pos")[0].currency,
        "USD"
    );
}

#[test]
fn schedules_number_activities_and_count_inclusive_durations() {
    let dir = temp_dir("schedules");
    let mut store = SqliteStore::open(&dir).expect("open store");
    let fx = seed(&mut store);

    let activity = |name: &str, start: &str, end: &str, progress: f64| NewActivity {
        name: name.to_string(),
        description: None,
        activity_type: ActivityType::Task,
        start_date: Some(start.to_string()),
        end_date: Some(end.to_string()),
        progress_percentage: progress,
        status: ActivityStatus::NotStarted,
    };
    let schedule = store
        .create_schedule(CreateScheduleRequest {
            project_id: fx.project_id.clone(),
            name: "Baseline".to_string(),
            description: None,
            start_date: Some("2026-01-01".to_string()),
            end_date: Some("2026-12-31".to_string()),
            activities: vec![
                activity("Survey", "2026-01-05", "2026-01-05", 100.0),
                activity("Fabrication", "2026-02-01", "2026-03-02", 20.0),
            ],
            now_ms: NOW_MS,
        })
        .expect("schedule");
    assert_eq!(schedule.status, ScheduleStatus::Draft);
    assert_eq!(schedule.activities[0].ordinal, 1);
    assert_eq!(schedule.activities[0].duration_days, Some(1));
    assert_eq!(schedule.activities[0].status, ActivityStatus::Completed);
    assert_eq!(schedule.activities[1].ordinal, 2);
    assert_eq!(schedule.activities[1].duration_days, Some(30));
    assert_eq!(schedule.activities[1].status, ActivityStatus::NotStarted);

    assert_eq!(
        store.list_schedules(&fx.project_id).expect("list"),
        vec![schedule]
    );

    let err = store
        .create_schedule(CreateScheduleRequest {
            project_id: fx.project_id.clone(),
            name: "Broken".to_string(),
            description: None,
            start_date: None,
            end_date: None,
            activities: vec![activity("Inverted", "2026-03-01", "2026-02-01", 0.0)],
            now_ms: NOW_MS,
        })
        .expect_err("inverted activity");
    assert!(matches!(err, StoreError::InvalidInput(_)), "{err:?}");
    assert_eq!(store.list_schedules(&fx.project_id).expect("list").len(), 1);
}
