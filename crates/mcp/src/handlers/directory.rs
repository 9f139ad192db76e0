#![forbid(unsafe_code)]

use super::render::{organization_json, user_json};
use crate::*;
use mt_core::model::{OrganizationType, UserRole};
use mt_storage::{CreateOrganizationRequest, CreateUserRequest, ListOrganizationsRequest};
use serde_json::{Value, json};

const DEFAULT_LIST_LIMIT: usize = 50;
const MAX_LIST_LIMIT: usize = 200;

impl McpServer {
    pub(crate) fn tool_organizations_create(&mut self, args: &Args) -> Result<Value, Value> {
        let request = CreateOrganizationRequest {
            name: require_string(args, "name")?,
            org_type: require_label(
                args,
                "org_type",
                OrganizationType::parse,
                OrganizationType::labels,
            )?,
            country: optional_string(args, "country")?,
            address: optional_string(args, "address")?,
            contact_email: optional_string(args, "contact_email")?,
            contact_phone: optional_string(args, "contact_phone")?,
            tax_id: optional_string(args, "tax_id")?,
            now_ms: now_ms_i64(),
        };
        let row = self
            .store
            .create_organization(request)
            .map_err(store_error)?;
        Ok(ai_ok(
            "organizations_create",
            json!({ "organization": organization_json(&row) }),
        ))
    }

    pub(crate) fn tool_organizations_list(&mut self, args: &Args) -> Result<Value, Value> {
        let org_type = optional_label(
            args,
            "org_type",
            OrganizationType::parse,
            OrganizationType::labels,
        )?;
        let limit = optional_usize(args, "limit")?
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);
        let offset = optional_usize(args, "offset")?.unwrap_or(0);

        let rows = self
            .store
            .list_organizations(ListOrganizationsRequest {
                org_type,
                limit,
                offset,
            })
            .map_err(store_error)?;
        Ok(ai_ok(
            "organizations_list",
            json!({
                "count": rows.len(),
                "limit": limit,
                "offset": offset,
                "organizations": rows.iter().map(organization_json).collect::<Vec<_>>()
            }),
        ))
    }

    pub(crate) fn tool_users_create(&mut self, args: &Args) -> Result<Value, Value> {
        let request = CreateUserRequest {
            email: require_string(args, "email")?,
            first_name: require_string(args, "first_name")?,
            last_name: require_string(args, "last_name")?,
            role: require_label(args, "role", UserRole::parse, UserRole::labels)?,
            organization_id: optional_string(args, "organization_id")?,
            now_ms: now_ms_i64(),
        };
        let row = self.store.create_user(request).map_err(store_error)?;
        Ok(ai_ok("users_create", json!({ "user": user_json(&row) })))
    }
}
