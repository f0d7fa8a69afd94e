//! Domain model for notebook records.
//!
//! # Responsibility
//! - Define the label and record value types used by the store.
//! - Keep label-set mutation rules next to the data they protect.
//!
//! # Invariants
//! - A record's name is fixed at construction and is its only identity.
//! - `Record::add_label` never introduces a duplicate label.

pub mod label;
pub mod record;
