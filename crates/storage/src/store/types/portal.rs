#![forbid(unsafe_code)]

#[derive(Clone, Debug)]
pub struct IssueVendorTokenRequest {
    pub project_id: String,
    pub ttl_ms: i64,
    pub now_ms: i64,
}

#[derive(Clone, Debug)]
pub struct RevokeVendorTokenRequest {
    pub token_id: String,
    pub now_ms: i64,
}

/// A freshly signed token. The secret-bearing `token` string is only ever
/// returned here; the store keeps the id and lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedVendorToken {
    pub token_id: String,
    pub project_id: String,
    pub token: String,
    pub issued_at_ms: i64,
    pub expires_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VendorTokenRow {
    pub token_id: String,
    pub project_id: String,
    pub issued_at_ms: i64,
    pub expires_at_ms: i64,
    pub revoked_at_ms: Option<i64>,
}

/// What a verified token grants: access to exactly one project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VendorAccess {
    pub token_id: String,
    pub project_id: String,
    pub expires_at_ms: i64,
}
