//! Core domain logic for the notebook.
//! This crate owns records, the name-keyed store, snapshot persistence
//! and the interactive menu session.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod session;
pub mod store;
pub mod ui;

pub use config::{NotebookConfig, DEFAULT_SAVE_PATH};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::label::Label;
pub use model::record::Record;
pub use session::{parse_label_list, run_notebook, run_session, MenuChoice, SessionError};
pub use store::notebook::Notebook;
pub use store::{NotebookError, NotebookResult};
pub use ui::{ConsoleInterface, UserInterface};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
