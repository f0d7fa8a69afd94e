//! Front-end capability boundary.
//!
//! # Responsibility
//! - Define the two primitives a menu session needs from any front end.
//! - Ship the console implementation used by the CLI.
//!
//! # Invariants
//! - The store never depends on this module; only `session` does.

mod console;

pub use console::ConsoleInterface;

use std::io;

/// Input/output capability set required by the menu session.
pub trait UserInterface {
    /// Shows `prompt` and blocks until one line of input is available.
    ///
    /// The returned line has its trailing newline removed.
    ///
    /// # Errors
    /// - `io::ErrorKind::UnexpectedEof` when input is exhausted.
    fn get_input(&mut self, prompt: &str) -> io::Result<String>;

    /// Shows one message line.
    fn display_message(&mut self, message: &str) -> io::Result<()>;
}
