//! In-memory notebook store.
//!
//! # Responsibility
//! - Keep records keyed by name in insertion order.
//! - Expose add/find/edit/delete/search without leaking the container.
//! - Save and load the whole collection as one snapshot file.
//!
//! # Invariants
//! - At most one record per name; `add` overwrites in place.
//! - `load_from_file` replaces the collection only on full success.
//! - A failed save never leaves a partially written file at the save path.

use crate::config::{NotebookConfig, DEFAULT_SAVE_PATH};
use crate::db::{open_db, open_db_read_only, DbResult};
use crate::model::record::Record;
use crate::store::snapshot::{read_snapshot, write_snapshot};
use crate::store::{NotebookError, NotebookResult};
use log::{error, info, warn};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

const STAGING_SUFFIX: &str = ".tmp";
const BACKUP_SUFFIX: &str = ".bak";

/// Name-keyed collection of records with snapshot persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notebook {
    records: Vec<Record>,
    save_path: PathBuf,
}

impl Default for Notebook {
    fn default() -> Self {
        Self::with_save_path(DEFAULT_SAVE_PATH)
    }
}

impl Notebook {
    /// Creates an empty notebook saving to the default path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty notebook saving to `save_path`.
    pub fn with_save_path(save_path: impl Into<PathBuf>) -> Self {
        Self {
            records: Vec::new(),
            save_path: save_path.into(),
        }
    }

    /// Creates an empty notebook from runtime configuration.
    pub fn from_config(config: &NotebookConfig) -> Self {
        Self::with_save_path(config.save_path.clone())
    }

    /// Returns the configured snapshot path.
    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    /// Returns all records in iteration order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Inserts `record` under its name, overwriting any existing entry.
    ///
    /// An overwritten entry keeps its iteration position. Returns the
    /// replaced record, if any.
    pub fn add(&mut self, record: Record) -> Option<Record> {
        match self.position(record.name()) {
            Some(index) => Some(std::mem::replace(&mut self.records[index], record)),
            None => {
                self.records.push(record);
                None
            }
        }
    }

    /// Looks up a record by exact name.
    pub fn find(&self, name: &str) -> Option<&Record> {
        self.records.iter().find(|record| record.name() == name)
    }

    /// Looks up a record by exact name for in-place mutation.
    ///
    /// The record name cannot be changed through this reference, so the
    /// key stays consistent.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Record> {
        self.records.iter_mut().find(|record| record.name() == name)
    }

    /// Replaces labels and text of an existing record.
    ///
    /// Labels are rebuilt from `labels` verbatim, duplicates included.
    ///
    /// # Errors
    /// - `NotebookError::RecordNotFound` when `name` is absent; nothing changes.
    pub fn edit<I, S>(
        &mut self,
        name: &str,
        labels: I,
        text: impl Into<String>,
    ) -> NotebookResult<&Record>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let record = self
            .find_mut(name)
            .ok_or_else(|| NotebookError::RecordNotFound(name.to_string()))?;
        record.replace_labels(labels);
        record.replace_text(text);
        Ok(&*record)
    }

    /// Returns every record holding a label equal to `label`, in iteration order.
    pub fn search_by_label(&self, label: &str) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|record| record.has_label(label))
            .collect()
    }

    /// Removes and returns the record named `name`.
    ///
    /// # Errors
    /// - `NotebookError::RecordNotFound` when `name` is absent.
    pub fn delete(&mut self, name: &str) -> NotebookResult<Record> {
        let index = self
            .position(name)
            .ok_or_else(|| NotebookError::RecordNotFound(name.to_string()))?;
        Ok(self.records.remove(index))
    }

    /// Saves the whole notebook to the configured save path.
    pub fn save(&self) -> NotebookResult<()> {
        self.save_to_file(&self.save_path)
    }

    /// Loads the notebook from the configured save path.
    pub fn load(&mut self) -> NotebookResult<usize> {
        let path = self.save_path.clone();
        self.load_from_file(path)
    }

    /// Serializes the whole notebook to `path`, replacing any existing file.
    ///
    /// The snapshot is written to a sibling staging file first and then
    /// renamed over `path`.
    ///
    /// # Errors
    /// - `NotebookError::Io` when the staging file cannot be cleared or renamed.
    /// - `NotebookError::SnapshotWrite` when the snapshot database write fails.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> NotebookResult<()> {
        let path = path.as_ref();
        let started_at = Instant::now();
        let staging = staging_path(path);

        remove_if_exists(&staging)?;

        if let Err(source) = write_staging(&staging, &self.records) {
            error!(
                "event=notebook_save module=store status=error duration_ms={} error_code=snapshot_write_failed error={}",
                started_at.elapsed().as_millis(),
                source
            );
            if let Err(cleanup) = remove_if_exists(&staging) {
                warn!(
                    "event=notebook_save module=store status=warn error_code=staging_cleanup_failed error={}",
                    cleanup
                );
            }
            return Err(NotebookError::SnapshotWrite {
                path: path.to_path_buf(),
                source,
            });
        }

        fs::rename(&staging, path).map_err(|source| {
            error!(
                "event=notebook_save module=store status=error duration_ms={} error_code=snapshot_rename_failed error={}",
                started_at.elapsed().as_millis(),
                source
            );
            NotebookError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;

        info!(
            "event=notebook_save module=store status=ok records={} duration_ms={}",
            self.records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Replaces the notebook contents with the snapshot stored at `path`.
    ///
    /// Returns the number of loaded records.
    ///
    /// # Errors
    /// - `NotebookError::SnapshotMissing` when `path` does not exist.
    /// - `NotebookError::SnapshotUnreadable` when `path` is not a readable snapshot.
    /// - `NotebookError::Io` when existence of `path` cannot be checked.
    ///
    /// On every error the current contents are left untouched.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> NotebookResult<usize> {
        let path = path.as_ref();
        let started_at = Instant::now();

        let exists = path.try_exists().map_err(|source| NotebookError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if !exists {
            info!("event=notebook_load module=store status=missing");
            return Err(NotebookError::SnapshotMissing(path.to_path_buf()));
        }

        let records = read_file(path).map_err(|source| {
            error!(
                "event=notebook_load module=store status=error duration_ms={} error_code=snapshot_read_failed error={}",
                started_at.elapsed().as_millis(),
                source
            );
            NotebookError::SnapshotUnreadable {
                path: path.to_path_buf(),
                source,
            }
        })?;

        self.records = records;
        info!(
            "event=notebook_load module=store status=ok records={} duration_ms={}",
            self.records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(self.records.len())
    }

    /// Moves the file at the save path aside so a later save cannot replace it.
    ///
    /// The file is renamed to `<path>.bak`, or `<path>.bak.<n>` with the
    /// first free `n` when earlier backups exist. Returns the backup path.
    ///
    /// # Errors
    /// - `NotebookError::Io` when the rename fails; the file stays in place.
    pub fn back_up_save_file(&self) -> NotebookResult<PathBuf> {
        let backup = free_backup_path(&self.save_path).map_err(|source| NotebookError::Io {
            path: self.save_path.clone(),
            source,
        })?;
        fs::rename(&self.save_path, &backup).map_err(|source| {
            error!(
                "event=notebook_backup module=store status=error error_code=backup_rename_failed error={}",
                source
            );
            NotebookError::Io {
                path: self.save_path.clone(),
                source,
            }
        })?;
        warn!("event=notebook_backup module=store status=ok");
        Ok(backup)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.records.iter().position(|record| record.name() == name)
    }
}

fn write_staging(staging: &Path, records: &[Record]) -> DbResult<()> {
    let mut conn = open_db(staging)?;
    write_snapshot(&mut conn, records)
}

fn read_file(path: &Path) -> DbResult<Vec<Record>> {
    let conn = open_db_read_only(path)?;
    read_snapshot(&conn)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staged = OsString::from(path.as_os_str());
    staged.push(STAGING_SUFFIX);
    PathBuf::from(staged)
}

fn free_backup_path(path: &Path) -> std::io::Result<PathBuf> {
    let mut base = OsString::from(path.as_os_str());
    base.push(BACKUP_SUFFIX);
    let mut candidate = PathBuf::from(&base);
    let mut attempt = 1u32;
    while candidate.try_exists()? {
        let mut numbered = base.clone();
        numbered.push(format!(".{attempt}"));
        candidate = PathBuf::from(numbered);
        attempt += 1;
    }
    Ok(candidate)
}

fn remove_if_exists(path: &Path) -> NotebookResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(NotebookError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{free_backup_path, staging_path, Notebook};
    use crate::model::record::Record;
    use crate::store::NotebookError;
    use std::fs;
    use std::path::Path;

    #[test]
    fn staging_path_appends_suffix() {
        assert_eq!(
            staging_path(Path::new("/tmp/notebook.db")),
            Path::new("/tmp/notebook.db.tmp")
        );
    }

    #[test]
    fn overwrite_keeps_iteration_position() {
        let mut notebook = Notebook::with_save_path("unused.db");
        notebook.add(Record::new("a", ["x"], "1"));
        notebook.add(Record::new("b", ["x"], "2"));
        let replaced = notebook.add(Record::new("a", ["y"], "3"));

        assert_eq!(replaced, Some(Record::new("a", ["x"], "1")));
        let names: Vec<&str> = notebook.records().iter().map(Record::name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(notebook.find("a").unwrap().text(), "3");
    }

    #[test]
    fn free_backup_path_skips_existing_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notebook.db");
        assert_eq!(free_backup_path(&path).unwrap(), dir.path().join("notebook.db.bak"));

        fs::write(dir.path().join("notebook.db.bak"), b"older").unwrap();
        fs::write(dir.path().join("notebook.db.bak.1"), b"old").unwrap();
        assert_eq!(
            free_backup_path(&path).unwrap(),
            dir.path().join("notebook.db.bak.2")
        );
    }

    #[test]
    fn back_up_save_file_moves_file_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notebook.db");
        fs::write(&path, b"unreadable").unwrap();
        let notebook = Notebook::with_save_path(&path);

        let backup = notebook.back_up_save_file().unwrap();

        assert!(!path.exists());
        assert_eq!(fs::read(backup).unwrap(), b"unreadable".to_vec());
    }

    #[test]
    fn back_up_missing_save_file_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let notebook = Notebook::with_save_path(dir.path().join("absent.db"));

        let err = notebook.back_up_save_file().unwrap_err();
        assert!(matches!(err, NotebookError::Io { .. }));
    }
}
