#![forbid(unsafe_code)]

use mt_core::model::{OrganizationType, UserRole};

#[derive(Clone, Debug)]
pub struct CreateOrganizationRequest {
    pub name: String,
    pub org_type: OrganizationType,
    pub country: Option<String>,
    pub address: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub tax_id: Option<String>,
    pub now_ms: i64,
}

#[derive(Clone, Debug)]
pub struct ListOrganizationsRequest {
    pub org_type: Option<OrganizationType>,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrganizationRow {
    pub id: String,
    pub name: String,
    pub org_type: OrganizationType,
    pub country: Option<String>,
    pub address: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub tax_id: Option<String>,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug)]
pub struct CreateUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub organization_id: Option<String>,
    pub now_ms: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub organization_id: Option<String>,
    pub is_active: bool,
    pub created_at_ms: i64,
}

impl UserRow {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
