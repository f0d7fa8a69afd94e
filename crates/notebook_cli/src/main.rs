//! Notebook console entry point.
//!
//! # Responsibility
//! - Start file logging next to the working directory.
//! - Run one interactive notebook session on stdin/stdout.

use notebook_core::{init_logging, run_notebook, ConsoleInterface, NotebookConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = NotebookConfig::default();

    match std::env::current_dir() {
        Ok(cwd) => {
            let log_dir = config.resolve_log_dir(&cwd);
            if let Err(err) = init_logging(&config.log_level, &log_dir) {
                eprintln!("logging disabled: {err}");
            }
        }
        Err(err) => eprintln!("logging disabled: cannot resolve working directory: {err}"),
    }

    let mut console = ConsoleInterface::stdio();
    match run_notebook(&config, &mut console) {
        Ok(notebook) => {
            log::info!(
                "event=app_exit module=cli status=ok records={} version={}",
                notebook.len(),
                notebook_core::core_version()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("event=app_exit module=cli status=error error={}", err);
            eprintln!("notebook: {err}");
            ExitCode::FAILURE
        }
    }
}
