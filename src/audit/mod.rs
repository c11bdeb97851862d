//! Audit log for fintrack
//!
//! Every create, update and delete of a stored record is appended to
//! `audit.log` as one JSON object per line, with the record's state before
//! and after the change.

mod entry;
mod logger;

pub use entry::{summarize_changes, AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
