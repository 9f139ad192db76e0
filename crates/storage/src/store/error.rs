#![forbid(unsafe_code)]

use mt_core::lifecycle::TransitionError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("unknown {0}")]
    UnknownId(&'static str),
    #[error("revision mismatch (expected={expected}, actual={actual})")]
    RevisionMismatch { expected: i64, actual: i64 },
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(
        "milestone weights would exceed 100% (allocated={allocated}, requested={requested})"
    )]
    WeightBudgetExceeded { allocated: f64, requested: f64 },
    #[error("evidence upload failed for: {}", failed.join(", "))]
    EvidenceUpload { failed: Vec<String> },
    #[error("vendor token rejected: {0}")]
    Token(#[from] TokenError),
    #[error("conflict: {0}")]
    Conflict(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("legacy unsigned token; ask the project manager for a new link")]
    LegacyFormat,
    #[error("signature does not match")]
    BadSignature,
    #[error("token is not known")]
    Unknown,
    #[error("token has expired")]
    Expired,
    #[error("token has been revoked")]
    Revoked,
    #[error("milestone does not belong to the token's project")]
    ProjectMismatch,
}
