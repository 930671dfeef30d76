//! Task due-date and status calculator.
//!
//! # Responsibility
//! - Derive the next due date from last completion and interval.
//! - Classify a task as overdue, upcoming, or ok relative to an injected day.
//!
//! # Invariants
//! - Pure: no wall-clock reads, no side effects.
//! - `days_remaining == 0` and `days_remaining == upcoming_within_days` are
//!   both `Upcoming`.
//! - Month intervals clamp to the last day of the target month.

use crate::model::workshop::{IntervalUnit, MaintenanceTask};
use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Default lookahead window for the `Upcoming` category.
pub const DEFAULT_UPCOMING_WITHIN_DAYS: u32 = 7;

/// Scheduling category of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    /// Due date already passed.
    Overdue,
    /// Due within the lookahead window (inclusive on both ends).
    Upcoming,
    Ok,
}

impl ScheduleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::Upcoming => "upcoming",
            Self::Ok => "ok",
        }
    }

    /// Whether the task belongs in the attention list.
    pub fn needs_attention(self) -> bool {
        matches!(self, Self::Overdue | Self::Upcoming)
    }
}

/// Classification thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPolicy {
    pub upcoming_within_days: u32,
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self {
            upcoming_within_days: DEFAULT_UPCOMING_WITHIN_DAYS,
        }
    }
}

impl StatusPolicy {
    pub fn classify(&self, days_remaining: i64) -> ScheduleStatus {
        if days_remaining < 0 {
            ScheduleStatus::Overdue
        } else if days_remaining <= i64::from(self.upcoming_within_days) {
            ScheduleStatus::Upcoming
        } else {
            ScheduleStatus::Ok
        }
    }
}

/// Computed status for one task on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusDetails {
    pub status: ScheduleStatus,
    /// `due_date - today` in whole days; negative when overdue.
    pub days_remaining: i64,
    pub due_date: NaiveDate,
}

/// Adds `quantity` units to `from`.
///
/// Month arithmetic keeps the day-of-month when the target month has it and
/// otherwise clamps to that month's last day (Jan 31 + 1 month = Feb 28/29).
/// Results past the representable range saturate to `NaiveDate::MAX`.
pub fn add_interval(from: NaiveDate, quantity: u32, unit: IntervalUnit) -> NaiveDate {
    let shifted = match unit {
        IntervalUnit::Days => from.checked_add_days(Days::new(u64::from(quantity))),
        IntervalUnit::Weeks => from.checked_add_days(Days::new(u64::from(quantity) * 7)),
        IntervalUnit::Months => from.checked_add_months(Months::new(quantity)),
    };
    shifted.unwrap_or(NaiveDate::MAX)
}

/// Next due date of `task`.
pub fn due_date(task: &MaintenanceTask) -> NaiveDate {
    add_interval(
        task.last_maintenance_date,
        task.maintenance_interval,
        task.interval_unit,
    )
}

/// Computes due date, remaining days and category for `task` as of `today`.
pub fn task_status(
    task: &MaintenanceTask,
    today: NaiveDate,
    policy: &StatusPolicy,
) -> TaskStatusDetails {
    let due_date = due_date(task);
    let days_remaining = due_date.signed_duration_since(today).num_days();
    TaskStatusDetails {
        status: policy.classify(days_remaining),
        days_remaining,
        due_date,
    }
}
