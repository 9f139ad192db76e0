#![forbid(unsafe_code)]

//! Signed vendor tokens.
//!
//! Wire form: `base64url(payload).base64url(hmac_sha256(secret, payload))`,
//! payload `v1|<token_id>|<project_id>|<issued_at_ms>|<expires_at_ms>`.

use super::super::TokenError;
use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const VERSION: &str = "v1";
const LEGACY_PREFIX: &str = "vendor_";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct TokenClaims {
    pub token_id: String,
    pub project_id: String,
    pub issued_at_ms: i64,
    pub expires_at_ms: i64,
}

pub(super) fn encode(secret: &[u8], claims: &TokenClaims) -> Result<String, TokenError> {
    let payload = format!(
        "{VERSION}|{}|{}|{}|{}",
        claims.token_id, claims.project_id, claims.issued_at_ms, claims.expires_at_ms
    );
    let signature = sign(secret, payload.as_bytes())?.finalize().into_bytes();
    Ok(format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(payload.as_bytes()),
        URL_SAFE_NO_PAD.encode(signature)
    ))
}

/// Checks the signature (constant time) and parses the claims. Expiry and
/// revocation are the caller's business.
pub(super) fn decode(secret: &[u8], token: &str) -> Result<TokenClaims, TokenError> {
    let token = token.trim();
    let Some((payload_b64, signature_b64)) = token.split_once('.') else {
        return Err(if is_legacy(token) {
            TokenError::LegacyFormat
        } else {
            TokenError::Malformed
        });
    };

    let payload = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| TokenError::Malformed)?;
    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| TokenError::Malformed)?;
    sign(secret, &payload)?
        .verify_slice(&signature)
        .map_err(|_| TokenError::BadSignature)?;

    let payload = String::from_utf8(payload).map_err(|_| TokenError::Malformed)?;
    parse_payload(&payload)
}

fn sign(secret: &[u8], payload: &[u8]) -> Result<HmacSha256, TokenError> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| TokenError::BadSignature)?;
    mac.update(payload);
    Ok(mac)
}

fn parse_payload(payload: &str) -> Result<TokenClaims, TokenError> {
    let parts = payload.split('|').collect::<Vec<_>>();
    let [version, token_id, project_id, issued_at_ms, expires_at_ms] = parts.as_slice() else {
        return Err(TokenError::Malformed);
    };
    if *version != VERSION || token_id.is_empty() || project_id.is_empty() {
        return Err(TokenError::Malformed);
    }
    Ok(TokenClaims {
        token_id: token_id.to_string(),
        project_id: project_id.to_string(),
        issued_at_ms: issued_at_ms.parse().map_err(|_| TokenError::Malformed)?,
        expires_at_ms: expires_at_ms.parse().map_err(|_| TokenError::Malformed)?,
    })
}

/// Old portal links were `base64("vendor_<projectId>_<timestamp>")`: unsigned
/// and guessable. They are recognised only to be refused with a clear error.
fn is_legacy(token: &str) -> bool {
    STANDARD
        .decode(token)
        .or_else(|_| URL_SAFE_NO_PAD.decode(token.trim_end_matches('=')))
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .is_some_and(|decoded| decoded.starts_with(LEGACY_PREFIX))
}
