//! Attention-list aggregation over the workshop hierarchy.
//!
//! # Invariants
//! - Output is sorted by `days_remaining` ascending.
//! - Ties keep workshop -> equipment -> task traversal order (stable sort).
//! - Full recompute on every call; no cached state.

use super::status::{task_status, ScheduleStatus, StatusPolicy};
use crate::model::workshop::{IntervalUnit, Workshop};
use crate::model::RecordId;
use chrono::NaiveDate;
use serde::Serialize;

/// One task needing attention, with display names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingTask {
    pub workshop_id: RecordId,
    pub equipment_id: RecordId,
    pub task_id: RecordId,
    pub workshop_name: String,
    pub equipment_name: String,
    pub task_name: String,
    pub status: ScheduleStatus,
    pub days_remaining: i64,
    pub due_date: NaiveDate,
    pub maintenance_interval: u32,
    pub interval_unit: IntervalUnit,
    pub last_maintenance_date: NaiveDate,
}

/// Status counts across the whole hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub overdue: usize,
    pub upcoming: usize,
    pub ok: usize,
    pub total: usize,
}

/// Collects overdue and upcoming tasks, most urgent first.
pub fn upcoming_tasks(
    workshops: &[Workshop],
    today: NaiveDate,
    policy: &StatusPolicy,
) -> Vec<UpcomingTask> {
    let mut tasks = Vec::new();
    for workshop in workshops {
        for equip in &workshop.equipment {
            for task in &equip.tasks {
                let details = task_status(task, today, policy);
                if !details.status.needs_attention() {
                    continue;
                }
                tasks.push(UpcomingTask {
                    workshop_id: workshop.id.clone(),
                    equipment_id: equip.id.clone(),
                    task_id: task.id.clone(),
                    workshop_name: workshop.name.clone(),
                    equipment_name: equip.name.clone(),
                    task_name: task.name.clone(),
                    status: details.status,
                    days_remaining: details.days_remaining,
                    due_date: details.due_date,
                    maintenance_interval: task.maintenance_interval,
                    interval_unit: task.interval_unit,
                    last_maintenance_date: task.last_maintenance_date,
                });
            }
        }
    }
    // `sort_by_key` is stable.
    tasks.sort_by_key(|task| task.days_remaining);
    tasks
}

/// Counts tasks per status.
pub fn summarize(workshops: &[Workshop], today: NaiveDate, policy: &StatusPolicy) -> StatusSummary {
    let mut summary = StatusSummary::default();
    let all_tasks = workshops
        .iter()
        .flat_map(|workshop| workshop.equipment.iter())
        .flat_map(|equip| equip.tasks.iter());
    for task in all_tasks {
        match task_status(task, today, policy).status {
            ScheduleStatus::Overdue => summary.overdue += 1,
            ScheduleStatus::Upcoming => summary.upcoming += 1,
            ScheduleStatus::Ok => summary.ok += 1,
        }
        summary.total += 1;
    }
    summary
}
