//! Domain model for the workshop hierarchy and the completion history.
//!
//! # Responsibility
//! - Define canonical data structures used by scheduling and ledger logic.
//! - Provide copy-on-write helpers for building replacement values.
//!
//! # Invariants
//! - Every record is identified by a stable opaque `RecordId`.
//! - `MaintenanceTask::maintenance_interval` is always greater than zero.
//! - `HistoryEntry::edit_count` never exceeds `MAX_HISTORY_EDITS`.

pub mod history;
pub mod workshop;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque identifier shared by workshops, equipment, tasks and history.
///
/// Uniqueness is the only guaranteed property.
pub type RecordId = String;

/// Validation failures for model values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// A display name is empty after trim.
    BlankName { kind: &'static str, id: RecordId },
    /// A task interval is zero.
    ZeroInterval { task_id: RecordId },
    /// A history entry has been edited more often than allowed.
    EditCountExceeded { entry_id: RecordId, edit_count: u8 },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName { kind, id } => write!(f, "{kind} name must not be blank: {id}"),
            Self::ZeroInterval { task_id } => {
                write!(f, "maintenance interval must be positive: {task_id}")
            }
            Self::EditCountExceeded {
                entry_id,
                edit_count,
            } => write!(
                f,
                "history entry {entry_id} has edit_count {edit_count}, limit is {}",
                history::MAX_HISTORY_EDITS
            ),
        }
    }
}

impl Error for ModelValidationError {}
