#![forbid(unsafe_code)]

//! Object storage for evidence files.
//!
//! Blobs are written in two phases: `stage` puts the bytes somewhere no reader
//! can see them, `promote` makes them live. A submission only promotes after
//! every file of the batch has been staged, so a failed batch leaves nothing
//! behind in the live namespace.

use std::io;
use std::path::{Path, PathBuf};

pub trait EvidenceBucket: std::fmt::Debug + Send {
    fn stage(&self, path: &str, bytes: &[u8]) -> io::Result<()>;

    /// Drops a staged blob. Missing blobs are not an error.
    fn discard(&self, path: &str) -> io::Result<()>;

    fn promote(&self, path: &str) -> io::Result<()>;

    /// Deletes a live blob. Missing blobs are not an error.
    fn remove(&self, path: &str) -> io::Result<()>;

    fn contains(&self, path: &str) -> bool;

    fn public_url(&self, path: &str) -> String;
}

/// Directory-backed bucket: live blobs in `root/`, staged ones in `root/staging/`.
#[derive(Clone, Debug)]
pub struct FsBucket {
    root: PathBuf,
    staging: PathBuf,
    public_base_url: Option<String>,
}

impl FsBucket {
    pub fn open(root: impl AsRef<Path>, public_base_url: Option<String>) -> io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let staging = root.join("staging");
        std::fs::create_dir_all(&staging)?;
        let public_base_url = public_base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        Ok(Self {
            root,
            staging,
            public_base_url,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn live_path(&self, path: &str) -> io::Result<PathBuf> {
        Ok(self.root.join(checked_object_name(path)?))
    }

    fn staged_path(&self, path: &str) -> io::Result<PathBuf> {
        Ok(self.staging.join(checked_object_name(path)?))
    }
}

impl EvidenceBucket for FsBucket {
    fn stage(&self, path: &str, bytes: &[u8]) -> io::Result<()> {
        std::fs::write(self.staged_path(path)?, bytes)
    }

    fn discard(&self, path: &str) -> io::Result<()> {
        ignore_missing(std::fs::remove_file(self.staged_path(path)?))
    }

    fn promote(&self, path: &str) -> io::Result<()> {
        let live = self.live_path(path)?;
        if live.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("evidence object already exists: {path}"),
            ));
        }
        std::fs::rename(self.staged_path(path)?, live)
    }

    fn remove(&self, path: &str) -> io::Result<()> {
        ignore_missing(std::fs::remove_file(self.live_path(path)?))
    }

    fn contains(&self, path: &str) -> bool {
        self.live_path(path).is_ok_and(|p| p.is_file())
    }

    fn public_url(&self, path: &str) -> String {
        match self.public_base_url.as_deref() {
            Some(base) => format!("{base}/evidence-files/{path}"),
            None => format!("file://{}", self.root.join(path).display()),
        }
    }
}

/// Object names are flat: no separators, no parent references.
fn checked_object_name(path: &str) -> io::Result<&str> {
    let ok = !path.is_empty()
        && path != "."
        && path != ".."
        && !path.contains(['/', '\\'])
        && !path.contains("..");
    if ok {
        Ok(path)
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid evidence object name: {path}"),
        ))
    }
}

fn ignore_missing(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
