//! # Snapshot Files
//!
//! JSON persistence of [`RegistrySnapshot`]s for collaborators that want
//! the registry to survive restarts. The registry itself never calls into
//! this module.
//!
//! Writes go to a uniquely named temporary file in the target's directory,
//! which is synced and then renamed over the target. A crash mid-write
//! leaves the previous snapshot intact, and concurrent writers never touch
//! each other's temporary files.
//!
//! ## Store locking
//!
//! Renaming makes each write atomic but not each load-modify-save cycle.
//! Processes that share a store file hold a [`StoreLock`] (an advisory
//! exclusive lock on `<store>.lock`) from load until save.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use evreg_core::Clock;
use fs2::FileExt;
use thiserror::Error;

use crate::error::RegistryError;
use crate::registry::EvidenceRegistry;
use crate::snapshot::RegistrySnapshot;

/// Errors reading or writing a snapshot file.
#[derive(Error, Debug)]
pub enum SnapshotFileError {
    /// Filesystem failure.
    #[error("I/O error on {path}")]
    Io {
        /// File being read, written or locked.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid snapshot document.
    #[error("malformed snapshot JSON in {path}")]
    Json {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed but violates a registry invariant.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

fn io_error(path: &Path) -> impl Fn(std::io::Error) -> SnapshotFileError + '_ {
    move |source| SnapshotFileError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read a snapshot file. A missing file yields `Ok(None)`.
///
/// # Errors
///
/// Returns [`SnapshotFileError::Io`] for read failures other than
/// not-found, and [`SnapshotFileError::Json`] for malformed content.
pub fn read_snapshot(path: &Path) -> Result<Option<RegistrySnapshot>, SnapshotFileError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(io_error(path)(source)),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| SnapshotFileError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Write `snapshot` to `path` atomically.
///
/// # Errors
///
/// Returns [`SnapshotFileError::Io`] if the temporary file cannot be
/// created, written, synced or renamed.
pub fn write_snapshot(snapshot: &RegistrySnapshot, path: &Path) -> Result<(), SnapshotFileError> {
    let json = serde_json::to_vec_pretty(snapshot).map_err(|source| SnapshotFileError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut prefix = std::ffi::OsString::from(".");
    if let Some(name) = path.file_name() {
        prefix.push(name);
    }
    prefix.push(".");

    let io_err = io_error(path);
    let mut tmp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(&io_err)?;
    tmp.write_all(&json)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(&io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// Load a registry from `path`, or start empty if the file does not exist.
///
/// # Errors
///
/// Propagates read, parse and invariant failures.
pub fn load_registry(
    path: &Path,
    clock: Arc<dyn Clock>,
) -> Result<EvidenceRegistry, SnapshotFileError> {
    match read_snapshot(path)? {
        Some(snapshot) => Ok(EvidenceRegistry::from_snapshot(snapshot, clock)?),
        None => {
            tracing::info!(path = %path.display(), "no snapshot file, starting empty");
            Ok(EvidenceRegistry::with_clock(clock))
        }
    }
}

/// Snapshot `registry` and write it to `path` atomically.
///
/// # Errors
///
/// Propagates write failures.
pub fn save_registry(registry: &EvidenceRegistry, path: &Path) -> Result<(), SnapshotFileError> {
    let snapshot = registry.snapshot();
    write_snapshot(&snapshot, path)?;
    tracing::info!(
        path = %path.display(),
        records = snapshot.records.len(),
        "registry snapshot written"
    );
    Ok(())
}

/// Exclusive advisory lock on a store file, released on drop.
///
/// The lock lives on a `<store>.lock` sibling, never on the store itself,
/// because the store is replaced by rename on every write.
#[derive(Debug)]
pub struct StoreLock {
    _file: File,
}

impl StoreLock {
    /// Block until the lock for `store` is held.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotFileError::Io`] if the lock file cannot be opened
    /// or locked.
    pub fn exclusive(store: &Path) -> Result<Self, SnapshotFileError> {
        let path = lock_path_for(store);
        let io_err = io_error(&path);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(&io_err)?;
        FileExt::lock_exclusive(&file).map_err(&io_err)?;
        tracing::debug!(lock = %path.display(), "store lock acquired");
        Ok(Self { _file: file })
    }
}

/// `<store>.lock`
fn lock_path_for(store: &Path) -> PathBuf {
    let mut p = store.as_os_str().to_owned();
    p.push(".lock");
    PathBuf::from(p)
}
