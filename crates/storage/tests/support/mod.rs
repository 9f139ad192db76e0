#![forbid(unsafe_code)]
#![allow(dead_code)]

use mt_core::model::{OrganizationType, UserRole};
use mt_storage::{
    CreateMilestoneRequest, CreateOrganizationRequest, CreateProjectRequest,
    CreatePurchaseOrderRequest, CreateUserRequest, EvidenceUpload, MilestoneRow, SqliteStore,
};
use std::path::PathBuf;

/// 2026-10-19T08:53:20Z
pub const NOW_MS: i64 = 1_792_400_000_000;
pub const DAY_MS: i64 = 86_400_000;

pub fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("mt_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub struct Fixture {
    pub client_id: String,
    pub vendor_id: String,
    pub manager_id: String,
    pub vendor_user_id: String,
    pub project_id: String,
    pub purchase_order_id: String,
}

pub fn seed(store: &mut SqliteStore) -> Fixture {
    let client = store
        .create_organization(organization("Harbor Logistics", OrganizationType::Client))
        .expect("client org");
    let vendor = store
        .create_organization(organization("Steelworks Ltd", OrganizationType::Vendor))
        .expect("vendor org");
    let manager = store
        .create_user(CreateUserRequest {
            email: "pm@harbor.example".to_string(),
            first_name: "Dana".to_string(),
            last_name: "Okafor".to_string(),
            role: UserRole::ProjectManager,
            organization_id: Some(client.id.clone()),
            now_ms: NOW_MS,
        })
        .expect("manager");
    let vendor_user = store
        .create_user(CreateUserRequest {
            email: "site@steelworks.example".to_string(),
            first_name: "Lee".to_string(),
            last_name: "Park".to_string(),
            role: UserRole::Vendor,
            organization_id: Some(vendor.id.clone()),
            now_ms: NOW_MS,
        })
        .expect("vendor user");
    let project = store
        .create_project(CreateProjectRequest {
            name: "Terminal 4 expansion".to_string(),
            description: None,
            client_id: client.id.clone(),
            project_manager_id: manager.id.clone(),
            vendor_id: Some(vendor.id.clone()),
            start_date: Some("2026-01-01".to_string()),
            end_date: Some("2027-06-30".to_string()),
            budget: Some(250_000.0),
            currency: None,
            now_ms: NOW_MS,
        })
        .expect("project");
    let po = store
        .create_purchase_order(CreatePurchaseOrderRequest {
            po_number: "PO-2026-0042".to_string(),
            project_id: project.id.clone(),
            vendor_id: vendor.id.clone(),
            title: "Structural steel".to_string(),
            description: None,
            total_amount: 120_000.0,
            currency: Some("usd".to_string()),
            issue_date: Some("2026-02-01".to_string()),
            expected_delivery_date: None,
            now_ms: NOW_MS,
        })
        .expect("purchase order");

    Fixture {
        client_id: client.id,
        vendor_id: vendor.id,
        manager_id: manager.id,
        vendor_user_id: vendor_user.id,
        project_id: project.id,
        purchase_order_id: po.id,
    }
}

pub fn organization(name: &str, org_type: OrganizationType) -> CreateOrganizationRequest {
    CreateOrganizationRequest {
        name: name.to_string(),
        org_type,
        country: None,
        address: None,
        contact_email: None,
        contact_phone: None,
        tax_id: None,
        now_ms: NOW_MS,
    }
}

pub fn milestone(
    store: &mut SqliteStore,
    project_id: &str,
    name: &str,
    weight: f64,
    due_date: &str,
) -> MilestoneRow {
    store
        .create_milestone(CreateMilestoneRequest {
            project_id: project_id.to_string(),
            purchase_order_id: None,
            template_id: None,
            name: name.to_string(),
            description: None,
            weight_percentage: Some(weight),
            due_date: Some(due_date.to_string()),
            evidence_required: Some(true),
            now_ms: NOW_MS,
        })
        .expect("create milestone")
}

pub fn upload(name: &str, bytes: &[u8]) -> EvidenceUpload {
    EvidenceUpload {
        file_name: name.to_string(),
        mime_type: None,
        description: None,
        bytes: bytes.to_vec(),
    }
}
