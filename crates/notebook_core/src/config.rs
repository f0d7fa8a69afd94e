//! Runtime configuration for notebook sessions.
//!
//! # Responsibility
//! - Carry the snapshot path and logging settings as one explicit value.
//! - Provide defaults used by the CLI entry point.
//!
//! # Invariants
//! - No process-wide mutable configuration; callers pass this value down.

use crate::logging::default_log_level;
use std::path::{Path, PathBuf};

/// Default snapshot file, relative to the working directory.
pub const DEFAULT_SAVE_PATH: &str = "notebook.db";
/// Default log directory, relative to the working directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Settings for one notebook process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookConfig {
    /// Snapshot file loaded at startup and written at exit.
    pub save_path: PathBuf,
    /// Log level passed to `init_logging`.
    pub log_level: String,
    /// Log directory; resolved to an absolute path before logging starts.
    pub log_dir: PathBuf,
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
            log_level: default_log_level().to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl NotebookConfig {
    /// Returns a config using `save_path` and default logging settings.
    pub fn with_save_path(save_path: impl Into<PathBuf>) -> Self {
        Self {
            save_path: save_path.into(),
            ..Self::default()
        }
    }

    /// Returns the log directory, joined onto `base` when relative.
    pub fn resolve_log_dir(&self, base: &Path) -> PathBuf {
        if self.log_dir.is_absolute() {
            self.log_dir.clone()
        } else {
            base.join(&self.log_dir)
        }
    }
}
