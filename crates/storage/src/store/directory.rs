#![forbid(unsafe_code)]

use super::*;
use mt_core::ids::RecordKind;

impl SqliteStore {
    pub fn create_organization(
        &mut self,
        request: CreateOrganizationRequest,
    ) -> Result<OrganizationRow, StoreError> {
        let CreateOrganizationRequest {
            name,
            org_type,
            country,
            address,
            contact_email,
            contact_phone,
            tax_id,
            now_ms,
        } = request;

        let name = required_text(&name, "organization name must not be empty")?;
        let contact_email = optional_text(contact_email)
            .map(|email| normalize_email(&email))
            .transpose()?;

        let tx = self.conn.transaction()?;
        let id = next_id_tx(&tx, RecordKind::Organization)?;
        let row = OrganizationRow {
            id,
            name,
            org_type,
            country: optional_text(country),
            address: optional_text(address),
            contact_email,
            contact_phone: optional_text(contact_phone),
            tax_id: optional_text(tax_id),
            created_at_ms: now_ms,
        };
        tx.execute(
            r#"
            INSERT INTO organizations(id, name, org_type, country, address, contact_email,
                                      contact_phone, tax_id, created_at_ms, updated_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            "#,
            params![
                &row.id,
                &row.name,
                row.org_type.as_str(),
                &row.country,
                &row.address,
                &row.contact_email,
                &row.contact_phone,
                &row.tax_id,
                now_ms
            ],
        )?;
        tx.commit()?;
        Ok(row)
    }

    pub fn list_organizations(
        &self,
        request: ListOrganizationsRequest,
    ) -> Result<Vec<OrganizationRow>, StoreError> {
        let limit = to_sqlite_i64(request.limit)?;
        let offset = to_sqlite_i64(request.offset)?;
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {ORGANIZATION_COLUMNS} FROM organizations
            WHERE ?1 IS NULL OR org_type = ?1
            ORDER BY name COLLATE NOCASE, rowid
            LIMIT ?2 OFFSET ?3
            "#
        ))?;
        let rows = stmt.query_map(
            params![request.org_type.map(|t| t.as_str()), limit, offset],
            organization_from_row,
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn get_organization(&self, id: &str) -> Result<OrganizationRow, StoreError> {
        let id = record_id(
            RecordKind::Organization,
            id,
            "organization id must look like ORG-<number>",
        )?;
        load_organization(&self.conn, &id)
    }

    pub fn create_user(&mut self, request: CreateUserRequest) -> Result<UserRow, StoreError> {
        let CreateUserRequest {
            email,
            first_name,
            last_name,
            role,
            organization_id,
            now_ms,
        } = request;

        let email = normalize_email(&email)?;
        let first_name = required_text(&first_name, "first_name must not be empty")?;
        let last_name = last_name.trim().to_string();
        let organization_id = optional_record_id(
            RecordKind::Organization,
            organization_id.as_deref(),
            "organization_id must look like ORG-<number>",
        )?;

        let tx = self.conn.transaction()?;
        if let Some(org_id) = organization_id.as_deref() {
            load_organization(&tx, org_id)?;
        }
        let id = next_id_tx(&tx, RecordKind::User)?;
        let inserted = tx.execute(
            r#"
            INSERT INTO users(id, email, first_name, last_name, role, organization_id,
                              is_active, created_at_ms, updated_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)
            "#,
            params![
                &id,
                &email,
                &first_name,
                &last_name,
                role.as_str(),
                &organization_id,
                now_ms
            ],
        );
        match inserted {
            Err(err) if is_unique_violation(&err) => {
                return Err(StoreError::Conflict("email is already registered"));
            }
            other => {
                other?;
            }
        }
        tx.commit()?;

        Ok(UserRow {
            id,
            email,
            first_name,
            last_name,
            role,
            organization_id,
            is_active: true,
            created_at_ms: now_ms,
        })
    }

    pub fn get_user(&self, id: &str) -> Result<UserRow, StoreError> {
        let id = record_id(RecordKind::User, id, "user id must look like USR-<number>")?;
        load_user(&self.conn, &id)
    }
}

fn normalize_email(value: &str) -> Result<String, StoreError> {
    let value = value.trim().to_ascii_lowercase();
    let valid = value
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        })
        && !value.contains(char::is_whitespace);
    if !valid {
        return Err(StoreError::InvalidInput("email address is not valid"));
    }
    Ok(value)
}
