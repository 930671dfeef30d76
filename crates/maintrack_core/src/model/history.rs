//! Completion history model.
//!
//! # Responsibility
//! - Define the audit record produced by completing a task.
//! - Own the bounded date-edit rule.
//!
//! # Invariants
//! - `original_completion_date` is set once at creation and never changes.
//! - `edit_count <= MAX_HISTORY_EDITS`; at the cap the entry is immutable.
//! - Workshop/equipment/task ids are back-references, not ownership.

use super::{ModelValidationError, RecordId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of date corrections allowed per history entry.
pub const MAX_HISTORY_EDITS: u8 = 2;

/// Audit record of one completed maintenance occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: RecordId,
    pub workshop_id: RecordId,
    pub equipment_id: RecordId,
    pub task_id: RecordId,
    /// Names captured at completion time; later renames do not touch them.
    pub workshop_name: String,
    pub equipment_name: String,
    pub task_name: String,
    /// Completion date as reported by the operator. Editable.
    pub maintenance_date: NaiveDate,
    /// Creation timestamp of this record.
    pub original_completion_date: DateTime<Utc>,
    pub edit_count: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl HistoryEntry {
    /// Returns whether another date correction is still allowed.
    pub fn is_editable(&self) -> bool {
        self.edit_count < MAX_HISTORY_EDITS
    }

    /// Remaining date corrections before the entry locks.
    pub fn remaining_edits(&self) -> u8 {
        MAX_HISTORY_EDITS.saturating_sub(self.edit_count)
    }

    /// Applies one date correction.
    ///
    /// Returns `false` and leaves the entry untouched once the cap is reached.
    pub fn correct_date(&mut self, new_date: NaiveDate) -> bool {
        if !self.is_editable() {
            return false;
        }
        self.maintenance_date = new_date;
        self.edit_count += 1;
        true
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.edit_count > MAX_HISTORY_EDITS {
            return Err(ModelValidationError::EditCountExceeded {
                entry_id: self.id.clone(),
                edit_count: self.edit_count,
            });
        }
        Ok(())
    }
}

/// Returns entries referencing `task_id`, in log order.
pub fn history_for_task<'a>(history: &'a [HistoryEntry], task_id: &str) -> Vec<&'a HistoryEntry> {
    history
        .iter()
        .filter(|entry| entry.task_id == task_id)
        .collect()
}

/// Returns the log in display order, most recently created first.
pub fn newest_first(history: &[HistoryEntry]) -> Vec<&HistoryEntry> {
    history.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry() -> HistoryEntry {
        HistoryEntry {
            id: "h1".to_string(),
            workshop_id: "w1".to_string(),
            equipment_id: "e1".to_string(),
            task_id: "t1".to_string(),
            workshop_name: "Line A".to_string(),
            equipment_name: "Pump".to_string(),
            task_name: "Replace filter".to_string(),
            maintenance_date: NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
            original_completion_date: Utc
                .with_ymd_and_hms(2024, 3, 1, 8, 0, 0)
                .single()
                .expect("valid timestamp"),
            edit_count: 0,
            notes: None,
        }
    }

    #[test]
    fn correct_date_locks_after_two_edits() {
        let mut entry = entry();
        let first = NaiveDate::from_ymd_opt(2024, 2, 28).expect("valid date");
        let second = NaiveDate::from_ymd_opt(2024, 2, 27).expect("valid date");
        let third = NaiveDate::from_ymd_opt(2024, 2, 26).expect("valid date");

        assert!(entry.correct_date(first));
        assert!(entry.correct_date(second));
        assert!(!entry.correct_date(third));
        assert_eq!(entry.maintenance_date, second);
        assert_eq!(entry.edit_count, MAX_HISTORY_EDITS);
        assert_eq!(entry.remaining_edits(), 0);
        assert!(entry.validate().is_ok());

        entry.edit_count = 3;
        assert!(entry.validate().is_err());
    }

    #[test]
    fn notes_are_omitted_from_json_when_absent() {
        let json = serde_json::to_string(&entry()).expect("serialize entry");
        assert!(!json.contains("notes"));
        assert!(json.contains("\"editCount\":0"));
    }

    #[test]
    fn queries_filter_by_task_and_reverse_for_display() {
        let first = entry();
        let mut second = entry();
        second.id = "h2".to_string();
        second.task_id = "t2".to_string();
        let mut third = entry();
        third.id = "h3".to_string();
        let log = vec![first, second, third];

        let for_t1: Vec<&str> = history_for_task(&log, "t1")
            .iter()
            .map(|entry| entry.id.as_str())
            .collect();
        assert_eq!(for_t1, vec!["h1", "h3"]);

        let display: Vec<&str> = newest_first(&log)
            .iter()
            .map(|entry| entry.id.as_str())
            .collect();
        assert_eq!(display, vec!["h3", "h2", "h1"]);
    }
}
