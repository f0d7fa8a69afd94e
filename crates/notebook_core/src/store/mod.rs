//! Record store and snapshot persistence.
//!
//! # Responsibility
//! - Own the name-keyed record collection and its CRUD/search operations.
//! - Write and read the whole collection as one snapshot file.
//!
//! # Invariants
//! - Record names are unique keys; adding by name overwrites.
//! - Failed operations report an error value and leave the store unchanged.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod notebook;
pub mod snapshot;

pub type NotebookResult<T> = Result<T, NotebookError>;

/// Reported failure for store operations.
#[derive(Debug)]
pub enum NotebookError {
    /// No record with this name exists.
    RecordNotFound(String),
    /// The snapshot file does not exist; nothing was loaded.
    SnapshotMissing(PathBuf),
    /// The snapshot file exists but could not be read as a snapshot.
    SnapshotUnreadable { path: PathBuf, source: DbError },
    /// Writing the snapshot database failed.
    SnapshotWrite { path: PathBuf, source: DbError },
    /// Filesystem failure around the snapshot file.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for NotebookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RecordNotFound(name) => write!(f, "note '{name}' not found"),
            Self::SnapshotMissing(path) => {
                write!(f, "file '{}' does not exist", path.display())
            }
            Self::SnapshotUnreadable { path, source } => {
                write!(f, "failed to read file '{}': {source}", path.display())
            }
            Self::SnapshotWrite { path, source } => {
                write!(f, "failed to write file '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "file system error at '{}': {source}", path.display())
            }
        }
    }
}

impl Error for NotebookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SnapshotUnreadable { source, .. } | Self::SnapshotWrite { source, .. } => {
                Some(source)
            }
            Self::Io { source, .. } => Some(source),
            Self::RecordNotFound(_) | Self::SnapshotMissing(_) => None,
        }
    }
}
