//! Pure copy-on-write mutations over the workshop list and history log.
//!
//! # Responsibility
//! - Implement add/update/delete workshop, task completion and history
//!   date correction as total functions.
//! - Report why a mutation did not apply instead of failing.
//!
//! # Invariants
//! - Inputs are never mutated; every call builds a new value.
//! - A skipped mutation returns a value equal to its input.
//! - History grows only through `complete_maintenance`.

use crate::model::history::HistoryEntry;
use crate::model::workshop::Workshop;
use crate::model::RecordId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Why a mutation left state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// An identifier (or identifier path) did not resolve.
    NotFound,
    /// History entry already reached its edit cap.
    EditLimitExceeded,
    /// Caller is not an editor.
    PermissionDenied,
    /// Replacement value failed model validation or a name was blank.
    InvalidInput,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::EditLimitExceeded => "edit_limit_exceeded",
            Self::PermissionDenied => "permission_denied",
            Self::InvalidInput => "invalid_input",
        }
    }
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    Skipped(SkipReason),
}

impl MutationOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Result value of a mutation plus whether it applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation<T> {
    pub value: T,
    pub outcome: MutationOutcome,
}

impl<T> Mutation<T> {
    pub(crate) fn applied(value: T) -> Self {
        Self {
            value,
            outcome: MutationOutcome::Applied,
        }
    }

    pub(crate) fn skipped(value: T, reason: SkipReason) -> Self {
        Self {
            value,
            outcome: MutationOutcome::Skipped(reason),
        }
    }
}

/// Full persisted state: hierarchy plus completion log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    pub workshops: Vec<Workshop>,
    pub history: Vec<HistoryEntry>,
}

/// Input for recording one completed maintenance occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub workshop_id: RecordId,
    pub equipment_id: RecordId,
    pub task_id: RecordId,
    pub completion_date: NaiveDate,
    pub notes: Option<String>,
}

/// Appends a new empty workshop named `name` (trimmed).
pub fn add_workshop(workshops: &[Workshop], id: RecordId, name: &str) -> Mutation<Vec<Workshop>> {
    let name = name.trim();
    if name.is_empty() {
        return Mutation::skipped(workshops.to_vec(), SkipReason::InvalidInput);
    }
    let mut next = workshops.to_vec();
    next.push(Workshop::new(id, name));
    Mutation::applied(next)
}

/// Replaces the workshop whose id matches `workshop.id`.
///
/// Ids of nested equipment and tasks are taken as given.
pub fn update_workshop(workshops: &[Workshop], workshop: Workshop) -> Mutation<Vec<Workshop>> {
    if !workshops.iter().any(|existing| existing.id == workshop.id) {
        return Mutation::skipped(workshops.to_vec(), SkipReason::NotFound);
    }
    if workshop.validate().is_err() {
        return Mutation::skipped(workshops.to_vec(), SkipReason::InvalidInput);
    }
    let next = workshops
        .iter()
        .map(|existing| {
            if existing.id == workshop.id {
                workshop.clone()
            } else {
                existing.clone()
            }
        })
        .collect();
    Mutation::applied(next)
}

/// Removes the workshop with `workshop_id`.
pub fn delete_workshop(workshops: &[Workshop], workshop_id: &str) -> Mutation<Vec<Workshop>> {
    let next: Vec<Workshop> = workshops
        .iter()
        .filter(|workshop| workshop.id != workshop_id)
        .cloned()
        .collect();
    if next.len() == workshops.len() {
        return Mutation::skipped(next, SkipReason::NotFound);
    }
    Mutation::applied(next)
}

/// Records a completion: moves the task's last date and appends history.
///
/// Both changes apply together or not at all.
pub fn complete_maintenance(
    state: &LedgerState,
    request: &CompletionRequest,
    entry_id: RecordId,
    now: DateTime<Utc>,
) -> Mutation<LedgerState> {
    let Some(path) = resolve_task_path(&state.workshops, request) else {
        return Mutation::skipped(state.clone(), SkipReason::NotFound);
    };

    let mut workshops = state.workshops.clone();
    let workshop = &mut workshops[path.workshop];
    let equip = &mut workshop.equipment[path.equipment];
    let task = &mut equip.tasks[path.task];
    task.last_maintenance_date = request.completion_date;

    let entry = HistoryEntry {
        id: entry_id,
        workshop_id: workshop.id.clone(),
        equipment_id: equip.id.clone(),
        task_id: task.id.clone(),
        workshop_name: workshop.name.clone(),
        equipment_name: equip.name.clone(),
        task_name: task.name.clone(),
        maintenance_date: request.completion_date,
        original_completion_date: now,
        edit_count: 0,
        notes: request
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .map(str::to_string),
    };

    let mut history = state.history.clone();
    history.push(entry);
    Mutation::applied(LedgerState { workshops, history })
}

/// Corrects the completion date of one history entry, at most twice.
pub fn update_history(
    history: &[HistoryEntry],
    history_id: &str,
    new_date: NaiveDate,
) -> Mutation<Vec<HistoryEntry>> {
    let mut next = history.to_vec();
    let Some(entry) = next.iter_mut().find(|entry| entry.id == history_id) else {
        return Mutation::skipped(next, SkipReason::NotFound);
    };
    if !entry.correct_date(new_date) {
        return Mutation::skipped(next, SkipReason::EditLimitExceeded);
    }
    Mutation::applied(next)
}

struct TaskPath {
    workshop: usize,
    equipment: usize,
    task: usize,
}

fn resolve_task_path(workshops: &[Workshop], request: &CompletionRequest) -> Option<TaskPath> {
    let workshop = workshops
        .iter()
        .position(|workshop| workshop.id == request.workshop_id)?;
    let equipment = workshops[workshop]
        .equipment
        .iter()
        .position(|equip| equip.id == request.equipment_id)?;
    let task = workshops[workshop].equipment[equipment]
        .tasks
        .iter()
        .position(|task| task.id == request.task_id)?;
    Some(TaskPath {
        workshop,
        equipment,
        task,
    })
}
