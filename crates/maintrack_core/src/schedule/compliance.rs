//! Completion compliance for history entries.
//!
//! An entry is `Late` when its completion date falls after the due date
//! implied by the previous completion of the same task under the task's
//! current interval. The earliest completion of a task has no reference and
//! counts as on time. Entries whose task no longer exists are `Unknown`.

use super::status::add_interval;
use crate::model::history::HistoryEntry;
use crate::model::workshop::{MaintenanceTask, Workshop};
use serde::Serialize;
use std::collections::HashMap;

/// Whether a completion happened within its interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionCompliance {
    OnTime,
    Late,
    /// Task was removed from the hierarchy.
    Unknown,
}

/// History entry annotated with its compliance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryWithStatus {
    pub entry: HistoryEntry,
    pub compliance: CompletionCompliance,
    /// Days past the implied due date; zero unless `Late`.
    pub overdue_days: i64,
}

/// Annotates every entry of `history`, preserving log order.
pub fn annotate_history(
    workshops: &[Workshop],
    history: &[HistoryEntry],
) -> Vec<HistoryEntryWithStatus> {
    let tasks = index_tasks(workshops);

    // Per task, entry positions ordered by completion date; ties keep log order.
    let mut by_task: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, entry) in history.iter().enumerate() {
        by_task.entry(entry.task_id.as_str()).or_default().push(index);
    }
    let mut previous: HashMap<usize, usize> = HashMap::new();
    for positions in by_task.values_mut() {
        positions.sort_by_key(|&index| history[index].maintenance_date);
        for pair in positions.windows(2) {
            previous.insert(pair[1], pair[0]);
        }
    }

    history
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let Some(task) = tasks.get(entry.task_id.as_str()) else {
                return HistoryEntryWithStatus {
                    entry: entry.clone(),
                    compliance: CompletionCompliance::Unknown,
                    overdue_days: 0,
                };
            };
            let overdue_days = previous
                .get(&index)
                .map(|&prev| {
                    let due = add_interval(
                        history[prev].maintenance_date,
                        task.maintenance_interval,
                        task.interval_unit,
                    );
                    entry
                        .maintenance_date
                        .signed_duration_since(due)
                        .num_days()
                        .max(0)
                })
                .unwrap_or(0);
            HistoryEntryWithStatus {
                entry: entry.clone(),
                compliance: if overdue_days > 0 {
                    CompletionCompliance::Late
                } else {
                    CompletionCompliance::OnTime
                },
                overdue_days,
            }
        })
        .collect()
}

fn index_tasks(workshops: &[Workshop]) -> HashMap<&str, &MaintenanceTask> {
    workshops
        .iter()
        .flat_map(|workshop| workshop.equipment.iter())
        .flat_map(|equip| equip.tasks.iter())
        .map(|task| (task.id.as_str(), task))
        .collect()
}
