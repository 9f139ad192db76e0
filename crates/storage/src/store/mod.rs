#![forbid(unsafe_code)]

mod analytics;
mod directory;
mod error;
mod evidence;
mod milestones;
mod portal;
mod projects;
mod purchase_orders;
mod review;
mod schedules;
mod support;
mod types;

pub use error::{StoreError, TokenError};
pub use types::*;

use crate::bucket::{EvidenceBucket, FsBucket};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::time::Duration;
use support::*;

const DB_FILE: &str = "milestone_tracker.db";
const BUCKET_DIR: &str = "evidence-files";
const PORTAL_SECRET_KEY: &str = "portal_secret";
const MIN_SECRET_LEN: usize = 16;

#[derive(Clone, Debug, Default)]
pub struct StoreOptions {
    /// Signing secret for vendor tokens. Generated and persisted when absent.
    pub portal_secret: Option<String>,
    /// Base for public evidence URLs; `file://` URLs when absent.
    pub public_base_url: Option<String>,
}

pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
    bucket: Box<dyn EvidenceBucket>,
    portal_secret: Vec<u8>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("storage_dir", &self.storage_dir)
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with(storage_dir, StoreOptions::default())
    }

    pub fn open_with(
        storage_dir: impl AsRef<Path>,
        options: StoreOptions,
    ) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref();
        let bucket = FsBucket::open(
            storage_dir.join(BUCKET_DIR),
            options.public_base_url.clone(),
        )?;
        Self::open_with_bucket(storage_dir, options, Box::new(bucket))
    }

    /// Opens the store with a caller-provided evidence bucket.
    pub fn open_with_bucket(
        storage_dir: impl AsRef<Path>,
        options: StoreOptions,
        bucket: Box<dyn EvidenceBucket>,
    ) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let conn = Connection::open(storage_dir.join(DB_FILE))?;
        conn.busy_timeout(Duration::from_secs(5))?;
        migrate_sqlite_schema(&conn)?;

        let portal_secret = resolve_portal_secret(&conn, options.portal_secret.as_deref())?;
        tracing::debug!(storage_dir = %storage_dir.display(), "store opened");

        Ok(Self {
            conn,
            storage_dir,
            bucket,
            portal_secret,
        })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn bucket(&self) -> &dyn EvidenceBucket {
        self.bucket.as_ref()
    }
}

fn resolve_portal_secret(conn: &Connection, configured: Option<&str>) -> Result<Vec<u8>, StoreError> {
    if let Some(secret) = configured.map(str::trim).filter(|s| !s.is_empty()) {
        if secret.len() < MIN_SECRET_LEN {
            return Err(StoreError::InvalidInput(
                "portal secret must be at least 16 characters",
            ));
        }
        return Ok(secret.as_bytes().to_vec());
    }

    let mut generated = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut generated);
    conn.execute(
        "INSERT OR IGNORE INTO meta(key, value) VALUES (?1, ?2)",
        params![PORTAL_SECRET_KEY, STANDARD.encode(generated)],
    )?;
    let stored = conn
        .query_row(
            "SELECT value FROM meta WHERE key=?1",
            params![PORTAL_SECRET_KEY],
            |row| row.get::<_, String>(0),
        )
        .optional()?
        .ok_or(StoreError::InvalidInput("portal secret is missing"))?;
    STANDARD
        .decode(stored.as_bytes())
        .map_err(|_| StoreError::InvalidInput("stored portal secret is corrupt"))
}
