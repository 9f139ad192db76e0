#![forbid(unsafe_code)]

mod token;

use super::milestones::milestone_record_id;
use super::projects::project_record_id;
use super::*;
use mt_core::ids::RecordKind;
use token::TokenClaims;

const TOKEN_COLUMNS: &str = "id, project_id, issued_at_ms, expires_at_ms, revoked_at_ms";

impl SqliteStore {
    /// Issues a signed portal token scoped to one project.
    pub fn issue_vendor_token(
        &mut self,
        request: IssueVendorTokenRequest,
    ) -> Result<IssuedVendorToken, StoreError> {
        let IssueVendorTokenRequest {
            project_id,
            ttl_ms,
            now_ms,
        } = request;
        let project_id = project_record_id(&project_id)?;
        if ttl_ms <= 0 {
            return Err(StoreError::InvalidInput("token lifetime must be positive"));
        }
        let expires_at_ms = now_ms.saturating_add(ttl_ms);

        let tx = self.conn.transaction()?;
        load_project(&tx, &project_id)?;
        let token_id = next_id_tx(&tx, RecordKind::VendorToken)?;
        tx.execute(
            &format!("INSERT INTO vendor_tokens({TOKEN_COLUMNS}) VALUES (?1, ?2, ?3, ?4, NULL)"),
            params![&token_id, &project_id, now_ms, expires_at_ms],
        )?;
        let claims = TokenClaims {
            token_id,
            project_id,
            issued_at_ms: now_ms,
            expires_at_ms,
        };
        let token = token::encode(&self.portal_secret, &claims)?;
        tx.commit()?;

        tracing::info!(
            token_id = %claims.token_id,
            project_id = %claims.project_id,
            expires_at_ms,
            "vendor token issued"
        );
        Ok(IssuedVendorToken {
            token_id: claims.token_id,
            project_id: claims.project_id,
            token,
            issued_at_ms: now_ms,
            expires_at_ms,
        })
    }

    /// Revokes a token. Revoking twice keeps the first revocation time.
    pub fn revoke_vendor_token(
        &mut self,
        request: RevokeVendorTokenRequest,
    ) -> Result<VendorTokenRow, StoreError> {
        let token_id = record_id(
            RecordKind::VendorToken,
            &request.token_id,
            "token_id must look like VT-<number>",
        )?;
        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE vendor_tokens SET revoked_at_ms=?2 WHERE id=?1 AND revoked_at_ms IS NULL",
            params![&token_id, request.now_ms],
        )?;
        let row = load_token(&tx, &token_id)?.ok_or(StoreError::UnknownId("vendor token"))?;
        tx.commit()?;

        tracing::info!(token_id = %row.token_id, "vendor token revoked");
        Ok(row)
    }

    pub fn list_vendor_tokens(&self, project_id: &str) -> Result<Vec<VendorTokenRow>, StoreError> {
        let project_id = project_record_id(project_id)?;
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TOKEN_COLUMNS} FROM vendor_tokens WHERE project_id=?1 ORDER BY rowid"
        ))?;
        let rows = stmt.query_map(params![&project_id], token_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Resolves a presented token to the single project it grants access to.
    pub fn verify_vendor_token(
        &self,
        token: &str,
        now_ms: i64,
    ) -> Result<VendorAccess, StoreError> {
        let result = self.verify_inner(token, now_ms);
        if let Err(err) = &result {
            tracing::warn!(error = %err, "vendor token rejected");
        }
        result.map_err(StoreError::from)
    }

    /// Loads a milestone on behalf of a portal caller, refusing milestones of
    /// other projects.
    pub fn portal_milestone(
        &self,
        access: &VendorAccess,
        milestone_id: &str,
    ) -> Result<MilestoneRow, StoreError> {
        let milestone_id = milestone_record_id(milestone_id)?;
        let milestone = load_milestone(&self.conn, &milestone_id)?;
        if milestone.project_id != access.project_id {
            tracing::warn!(
                token_id = %access.token_id,
                milestone_id = %milestone.id,
                "portal access outside token project"
            );
            return Err(TokenError::ProjectMismatch.into());
        }
        Ok(milestone)
    }

    fn verify_inner(&self, token: &str, now_ms: i64) -> Result<VendorAccess, TokenError> {
        let claims = token::decode(&self.portal_secret, token)?;
        let row = load_token(&self.conn, &claims.token_id)
            .map_err(|_| TokenError::Unknown)?
            .ok_or(TokenError::Unknown)?;
        if row.project_id != claims.project_id || row.expires_at_ms != claims.expires_at_ms {
            return Err(TokenError::Unknown);
        }
        if row.revoked_at_ms.is_some() {
            return Err(TokenError::Revoked);
        }
        if now_ms >= row.expires_at_ms {
            return Err(TokenError::Expired);
        }
        Ok(VendorAccess {
            token_id: row.token_id,
            project_id: row.project_id,
            expires_at_ms: row.expires_at_ms,
        })
    }
}

fn token_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<VendorTokenRow> {
    Ok(VendorTokenRow {
        token_id: row.get(0)?,
        project_id: row.get(1)?,
        issued_at_ms: row.get(2)?,
        expires_at_ms: row.get(3)?,
        revoked_at_ms: row.get(4)?,
    })
}

fn load_token(conn: &Connection, token_id: &str) -> Result<Option<VendorTokenRow>, StoreError> {
    Ok(conn
        .query_row(
            &format!("SELECT {TOKEN_COLUMNS} FROM vendor_tokens WHERE id=?1"),
            params![token_id],
            token_from_row,
        )
        .optional()?)
}
