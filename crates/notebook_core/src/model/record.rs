//! Record domain model.
//!
//! # Responsibility
//! - Hold one note: name, ordered labels and free text.
//! - Provide in-place label and text mutation helpers.
//!
//! # Invariants
//! - `name` is immutable after construction.
//! - `add_label` appends only when no equal label is present.
//! - Construction and `replace_labels` keep the given labels verbatim,
//!   duplicates included; only `add_label` de-duplicates.

use crate::model::label::Label;
use serde::{Deserialize, Serialize};

/// One named note with labels and text content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    name: String,
    labels: Vec<Label>,
    text: String,
}

impl Record {
    /// Creates a record from raw label strings.
    ///
    /// Labels are kept in the given order; duplicates are not removed.
    pub fn new<I, S>(name: impl Into<String>, labels: I, text: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            labels: labels.into_iter().map(Label::new).collect(),
            text: text.into(),
        }
    }

    /// Returns the record name (its store key).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns labels in insertion order.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Returns the text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Appends a label unless an equal one is already present.
    ///
    /// Returns `true` when the label set changed.
    pub fn add_label(&mut self, value: impl Into<String>) -> bool {
        let label = Label::new(value);
        if self.labels.contains(&label) {
            return false;
        }
        self.labels.push(label);
        true
    }

    /// Finds the first label whose text equals `value`.
    pub fn find_label(&self, value: &str) -> Option<&Label> {
        self.labels.iter().find(|label| label.value() == value)
    }

    /// Returns whether any label equals `value`.
    pub fn has_label(&self, value: &str) -> bool {
        self.find_label(value).is_some()
    }

    /// Removes the first label equal to `label`.
    ///
    /// Returns `false` (and changes nothing) when no such label exists.
    pub fn remove_label(&mut self, label: &Label) -> bool {
        match self.labels.iter().position(|current| current == label) {
            Some(index) => {
                self.labels.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replaces the whole label set with construction semantics.
    pub fn replace_labels<I, S>(&mut self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Label::new).collect();
    }

    /// Overwrites the text content.
    pub fn replace_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}
