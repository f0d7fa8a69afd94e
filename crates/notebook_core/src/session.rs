//! Interactive menu session over a notebook.
//!
//! # Responsibility
//! - Drive the numbered text menu through a `UserInterface`.
//! - Translate store results into user-facing messages.
//! - Load the snapshot at startup and save it on exit.
//!
//! # Invariants
//! - The session always attempts a save before it ends, including on
//!   end of input and front-end failures.
//! - A save file that could not be read is moved aside before the session
//!   starts, so the exit save never replaces it.
//! - Log events carry the menu action only, never note content.

use crate::config::NotebookConfig;
use crate::model::record::Record;
use crate::store::notebook::Notebook;
use crate::store::NotebookError;
use crate::ui::UserInterface;
use log::{debug, error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

static LABEL_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*,\s*").expect("valid label separator regex"));

const CHOICE_PROMPT: &str = "Select an option: ";
const CONTINUE_PROMPT: &str = "Press Enter to continue.";
const LABELS_PROMPT: &str = "Enter tags (if multiple, separate by comma): ";

/// One menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddNote,
    FindNote,
    SearchByTag,
    ShowAll,
    EditNote,
    EditText,
    EditTags,
    DeleteNote,
    AddTags,
    Exit,
}

const MENU: &[(MenuChoice, &str, &str)] = &[
    (MenuChoice::AddNote, "1", "Add a note"),
    (MenuChoice::FindNote, "2", "Find a note by name"),
    (MenuChoice::SearchByTag, "3", "Search by tag"),
    (MenuChoice::ShowAll, "4", "Show all notes"),
    (MenuChoice::EditNote, "5", "Edit a note"),
    (MenuChoice::EditText, "6", "Edit note text"),
    (MenuChoice::EditTags, "7", "Edit note tags"),
    (MenuChoice::DeleteNote, "8", "Delete a note"),
    (MenuChoice::AddTags, "9", "Add tags to a note"),
    (MenuChoice::Exit, "0", "Exit notebook"),
];

impl MenuChoice {
    /// Parses a digit or a case-insensitive phrase such as `find note`.
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input.trim().to_lowercase();
        MENU.iter()
            .find(|(choice, digit, _)| *digit == normalized || choice.phrase() == normalized)
            .map(|(choice, _, _)| *choice)
    }

    /// Typed shortcut accepted in place of the digit.
    pub fn phrase(self) -> &'static str {
        match self {
            Self::AddNote => "add note",
            Self::FindNote => "find note",
            Self::SearchByTag => "search by tag",
            Self::ShowAll => "show all notes",
            Self::EditNote => "edit a note",
            Self::EditText => "edit note text",
            Self::EditTags => "edit note tags",
            Self::DeleteNote => "delete a note",
            Self::AddTags => "add tags to a note",
            Self::Exit => "exit notebook",
        }
    }

    fn event_name(self) -> &'static str {
        match self {
            Self::AddNote => "add_note",
            Self::FindNote => "find_note",
            Self::SearchByTag => "search_by_tag",
            Self::ShowAll => "show_all",
            Self::EditNote => "edit_note",
            Self::EditText => "edit_text",
            Self::EditTags => "edit_tags",
            Self::DeleteNote => "delete_note",
            Self::AddTags => "add_tags",
            Self::Exit => "exit",
        }
    }
}

/// Session failure surfaced to the entry point.
#[derive(Debug)]
pub enum SessionError {
    /// Front end could not read or write. `save_error` holds the outcome
    /// of the save attempted before giving up, if that failed too.
    Io {
        source: io::Error,
        save_error: Option<NotebookError>,
    },
    /// Final snapshot save failed.
    Save(NotebookError),
    /// Startup could not safely set aside an unreadable save file.
    Load(NotebookError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io {
                source,
                save_error: None,
            } => write!(f, "front end failure: {source}"),
            Self::Io {
                source,
                save_error: Some(save_error),
            } => write!(
                f,
                "front end failure: {source}; saving also failed: {save_error}"
            ),
            Self::Save(err) => write!(f, "{err}"),
            Self::Load(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Save(err) | Self::Load(err) => Some(err),
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(value: io::Error) -> Self {
        Self::Io {
            source: value,
            save_error: None,
        }
    }
}

/// Splits comma-separated label input.
///
/// Pieces are trimmed and blank pieces dropped, so empty input yields no
/// labels rather than one empty label; duplicates are kept.
pub fn parse_label_list(input: &str) -> Vec<String> {
    LABEL_SEPARATOR_RE
        .split(input.trim())
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Loads the configured notebook, runs the menu, and returns the final state.
///
/// A missing snapshot is reported and the session starts empty. An
/// unreadable one (corrupt, or written by a newer build) is moved aside to
/// `<path>.bak` first; if that fails the session does not start.
pub fn run_notebook<U>(config: &NotebookConfig, ui: &mut U) -> Result<Notebook, SessionError>
where
    U: UserInterface + ?Sized,
{
    let mut notebook = Notebook::from_config(config);
    match notebook.load() {
        Ok(count) => ui.display_message(&format!(
            "Loaded {count} notes from '{}'.",
            notebook.save_path().display()
        ))?,
        Err(NotebookError::SnapshotMissing(path)) => ui.display_message(&format!(
            "File '{}' does not exist. Data not loaded.",
            path.display()
        ))?,
        Err(err @ NotebookError::SnapshotUnreadable { .. }) => {
            ui.display_message(&format!("Could not load notes: {err}."))?;
            match notebook.back_up_save_file() {
                Ok(backup) => ui.display_message(&format!(
                    "The unreadable file was moved to '{}'. Starting with an empty notebook.",
                    backup.display()
                ))?,
                Err(backup_err) => {
                    ui.display_message(&format!(
                        "Could not move the unreadable file aside: {backup_err}. Nothing was changed."
                    ))?;
                    return Err(SessionError::Load(backup_err));
                }
            }
        }
        Err(err) => {
            ui.display_message(&format!("Could not load notes: {err}. Nothing was changed."))?;
            return Err(SessionError::Load(err));
        }
    }

    run_session(&mut notebook, ui)?;
    Ok(notebook)
}

/// Runs the menu loop until the user exits or input ends, then saves.
///
/// # Errors
/// - `SessionError::Io` when the front end fails for a reason other than
///   end of input. A save is still attempted first.
/// - `SessionError::Save` when the final save fails.
pub fn run_session<U>(notebook: &mut Notebook, ui: &mut U) -> Result<(), SessionError>
where
    U: UserInterface + ?Sized,
{
    info!(
        "event=session_start module=session status=ok records={}",
        notebook.len()
    );

    loop {
        match run_step(notebook, ui) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                info!("event=session_input_closed module=session status=ok");
                break;
            }
            Err(err) => {
                error!(
                    "event=session_io module=session status=error error={}",
                    err
                );
                let save_error = notebook.save().err();
                match &save_error {
                    None => info!("event=session_end module=session status=error saved=true"),
                    Some(_) => error!(
                        "event=session_end module=session status=error saved=false error_code=save_failed"
                    ),
                }
                return Err(SessionError::Io {
                    source: err,
                    save_error,
                });
            }
        }
    }

    finish_session(notebook, ui)
}

/// Runs one menu round; returns `false` once the user picks exit.
fn run_step<U: UserInterface + ?Sized>(notebook: &mut Notebook, ui: &mut U) -> io::Result<bool> {
    show_menu(ui)?;
    let input = ui.get_input(CHOICE_PROMPT)?;
    match MenuChoice::parse(&input) {
        Some(MenuChoice::Exit) => return Ok(false),
        Some(choice) => {
            debug!(
                "event=menu_choice module=session status=ok choice={}",
                choice.event_name()
            );
            run_choice(notebook, ui, choice)?;
        }
        None => ui.display_message("Invalid choice. Please select a valid option.")?,
    }
    ui.get_input(CONTINUE_PROMPT)?;
    Ok(true)
}

fn finish_session<U>(notebook: &Notebook, ui: &mut U) -> Result<(), SessionError>
where
    U: UserInterface + ?Sized,
{
    match notebook.save() {
        Ok(()) => {
            ui.display_message(&format!(
                "Data saved to file '{}'.",
                notebook.save_path().display()
            ))?;
            ui.display_message("Goodbye!")?;
            info!("event=session_end module=session status=ok");
            Ok(())
        }
        Err(err) => {
            ui.display_message(&format!("Failed to save notes: {err}"))?;
            error!("event=session_end module=session status=error error_code=save_failed");
            Err(SessionError::Save(err))
        }
    }
}

fn show_menu<U: UserInterface + ?Sized>(ui: &mut U) -> io::Result<()> {
    ui.display_message("\nOptions:")?;
    for (_, digit, title) in MENU {
        ui.display_message(&format!("{digit}. {title}"))?;
    }
    Ok(())
}

fn run_choice<U: UserInterface + ?Sized>(
    notebook: &mut Notebook,
    ui: &mut U,
    choice: MenuChoice,
) -> io::Result<()> {
    match choice {
        MenuChoice::AddNote => add_note(notebook, ui),
        MenuChoice::FindNote => find_note(notebook, ui),
        MenuChoice::SearchByTag => search_by_tag(notebook, ui),
        MenuChoice::ShowAll => show_all(notebook, ui),
        MenuChoice::EditNote => edit_note(notebook, ui),
        MenuChoice::EditText => edit_text(notebook, ui),
        MenuChoice::EditTags => edit_tags(notebook, ui),
        MenuChoice::DeleteNote => delete_note(notebook, ui),
        MenuChoice::AddTags => add_tags(notebook, ui),
        MenuChoice::Exit => Ok(()),
    }
}

/// Names are trimmed for every action so lookups match what `add_note` stored.
fn prompt_name<U: UserInterface + ?Sized>(ui: &mut U, prompt: &str) -> io::Result<String> {
    Ok(ui.get_input(prompt)?.trim().to_string())
}

fn not_found<U: UserInterface + ?Sized>(ui: &mut U, name: &str) -> io::Result<()> {
    ui.display_message(&format!("Note with name '{name}' not found."))
}

fn add_note<U: UserInterface + ?Sized>(notebook: &mut Notebook, ui: &mut U) -> io::Result<()> {
    let name = prompt_name(ui, "Enter the name of the note: ")?;
    if name.is_empty() {
        return ui.display_message("Note name cannot be empty.");
    }
    let labels = parse_label_list(&ui.get_input(LABELS_PROMPT)?);
    let text = ui.get_input("Enter the text of the note: ")?;

    notebook.add(Record::new(name.as_str(), labels, text));
    ui.display_message(&format!("Note {name} has been added to the notebook."))
}

fn find_note<U: UserInterface + ?Sized>(notebook: &mut Notebook, ui: &mut U) -> io::Result<()> {
    let name = prompt_name(ui, "Enter the name of the note to find: ")?;
    match notebook.find(&name) {
        Some(record) => display_record(ui, record),
        None => not_found(ui, &name),
    }
}

fn search_by_tag<U: UserInterface + ?Sized>(
    notebook: &mut Notebook,
    ui: &mut U,
) -> io::Result<()> {
    let label = ui.get_input("Enter the tag for searching: ")?;
    let label = label.trim();
    let matches = notebook.search_by_label(label);
    if matches.is_empty() {
        return ui.display_message(&format!("No notes found with tag '{label}'."));
    }

    ui.display_message("Matching Records:")?;
    for record in matches {
        display_record(ui, record)?;
    }
    Ok(())
}

fn show_all<U: UserInterface + ?Sized>(notebook: &mut Notebook, ui: &mut U) -> io::Result<()> {
    if notebook.is_empty() {
        return ui.display_message("The notebook is empty.");
    }

    ui.display_message("List of all notes:")?;
    for record in notebook.records() {
        display_record(ui, record)?;
    }
    Ok(())
}

fn edit_note<U: UserInterface + ?Sized>(notebook: &mut Notebook, ui: &mut U) -> io::Result<()> {
    let name = prompt_name(ui, "Enter the name of the note to edit: ")?;
    let labels = parse_label_list(&ui.get_input(LABELS_PROMPT)?);
    let text = ui.get_input("Enter new text for the note: ")?;

    match notebook.edit(&name, labels, text) {
        Ok(_) => ui.display_message(&format!("Note {name} has been edited.")),
        Err(_) => not_found(ui, &name),
    }
}

fn edit_text<U: UserInterface + ?Sized>(notebook: &mut Notebook, ui: &mut U) -> io::Result<()> {
    let name = prompt_name(ui, "Enter the name of the note to edit text: ")?;
    let Some(record) = notebook.find_mut(&name) else {
        return not_found(ui, &name);
    };

    let text = ui.get_input("Enter new text: ")?;
    record.replace_text(text);
    ui.display_message(&format!("Text of note {name} has been changed."))
}

fn edit_tags<U: UserInterface + ?Sized>(notebook: &mut Notebook, ui: &mut U) -> io::Result<()> {
    let name = prompt_name(ui, "Enter the name of the note to edit tags: ")?;
    let Some(record) = notebook.find_mut(&name) else {
        return not_found(ui, &name);
    };

    let labels = parse_label_list(&ui.get_input(LABELS_PROMPT)?);
    record.replace_labels(labels);
    ui.display_message(&format!("Tags of note {name} have been changed."))
}

fn delete_note<U: UserInterface + ?Sized>(notebook: &mut Notebook, ui: &mut U) -> io::Result<()> {
    let name = prompt_name(ui, "Enter the name of the note to delete: ")?;
    match notebook.delete(&name) {
        Ok(_) => ui.display_message(&format!("Note {name} has been deleted from the notebook.")),
        Err(_) => not_found(ui, &name),
    }
}

fn add_tags<U: UserInterface + ?Sized>(notebook: &mut Notebook, ui: &mut U) -> io::Result<()> {
    let name = prompt_name(ui, "Enter the name of the note to add tags: ")?;
    let Some(record) = notebook.find_mut(&name) else {
        return not_found(ui, &name);
    };

    for label in parse_label_list(&ui.get_input(LABELS_PROMPT)?) {
        record.add_label(label);
    }
    ui.display_message(&format!("Tags have been added to note {name}."))
}

fn display_record<U: UserInterface + ?Sized>(ui: &mut U, record: &Record) -> io::Result<()> {
    let labels: Vec<&str> = record.labels().iter().map(|label| label.value()).collect();
    ui.display_message(&format!("Name: {}", record.name()))?;
    ui.display_message(&format!("Tags: {}", labels.join(", ")))?;
    ui.display_message(&format!("Text: {}", record.text()))
}
