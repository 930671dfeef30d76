//! Workshop hierarchy model.
//!
//! # Responsibility
//! - Define workshop -> equipment -> task ownership.
//! - Provide copy-on-write helpers that return new values.
//!
//! # Invariants
//! - Child order is insertion order and is preserved by every helper.
//! - Helpers never mutate the receiver.

use super::{ModelValidationError, RecordId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unit used to interpret `MaintenanceTask::maintenance_interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalUnit {
    Days,
    Weeks,
    /// Calendar months; see `schedule::status::due_date` for clamping.
    Months,
}

impl IntervalUnit {
    /// Stable lowercase id used in storage and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
        }
    }
}

/// Recurring maintenance duty attached to one equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceTask {
    pub id: RecordId,
    pub name: String,
    /// Interval quantity. Must be > 0.
    pub maintenance_interval: u32,
    pub interval_unit: IntervalUnit,
    /// Calendar date of the most recent completion.
    pub last_maintenance_date: NaiveDate,
}

impl MaintenanceTask {
    pub fn new(
        id: impl Into<RecordId>,
        name: impl Into<String>,
        maintenance_interval: u32,
        interval_unit: IntervalUnit,
        last_maintenance_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            maintenance_interval,
            interval_unit,
            last_maintenance_date,
        }
    }

    /// Checks name and interval invariants.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::BlankName {
                kind: "task",
                id: self.id.clone(),
            });
        }
        if self.maintenance_interval == 0 {
            return Err(ModelValidationError::ZeroInterval {
                task_id: self.id.clone(),
            });
        }
        Ok(())
    }
}

/// Maintained asset owned by exactly one workshop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<MaintenanceTask>,
}

impl Equipment {
    /// Creates equipment with no tasks.
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn find_task(&self, task_id: &str) -> Option<&MaintenanceTask> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    /// Returns a copy with `task` appended.
    pub fn with_task_added(&self, task: MaintenanceTask) -> Self {
        let mut next = self.clone();
        next.tasks.push(task);
        next
    }

    /// Returns a copy without the task matching `task_id`.
    pub fn without_task(&self, task_id: &str) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            tasks: self
                .tasks
                .iter()
                .filter(|task| task.id != task_id)
                .cloned()
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::BlankName {
                kind: "equipment",
                id: self.id.clone(),
            });
        }
        self.tasks.iter().try_for_each(MaintenanceTask::validate)
    }
}

/// Top-level grouping of equipment (a production line or area).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workshop {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
}

impl Workshop {
    /// Creates a workshop with no equipment.
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            equipment: Vec::new(),
        }
    }

    pub fn find_equipment(&self, equipment_id: &str) -> Option<&Equipment> {
        self.equipment.iter().find(|equip| equip.id == equipment_id)
    }

    /// Returns a copy with `equipment` appended.
    pub fn with_equipment_added(&self, equipment: Equipment) -> Self {
        let mut next = self.clone();
        next.equipment.push(equipment);
        next
    }

    /// Returns a copy without the equipment matching `equipment_id`.
    pub fn without_equipment(&self, equipment_id: &str) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            equipment: self
                .equipment
                .iter()
                .filter(|equip| equip.id != equipment_id)
                .cloned()
                .collect(),
        }
    }

    /// Returns a copy where the equipment matching `equipment.id` is replaced.
    ///
    /// Unknown ids leave the copy equal to `self`.
    pub fn with_equipment_replaced(&self, equipment: Equipment) -> Self {
        let mut next = self.clone();
        if let Some(slot) = next.equipment.iter_mut().find(|e| e.id == equipment.id) {
            *slot = equipment;
        }
        next
    }

    /// Validates the workshop and everything it owns.
    ///
    /// Does not check id uniqueness across the hierarchy.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::BlankName {
                kind: "workshop",
                id: self.id.clone(),
            });
        }
        self.equipment.iter().try_for_each(Equipment::validate)
    }

    /// Number of tasks across all equipment.
    pub fn task_count(&self) -> usize {
        self.equipment.iter().map(|equip| equip.tasks.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn sample() -> Workshop {
        let pump = Equipment::new("e1", "Pump").with_task_added(MaintenanceTask::new(
            "t1",
            "Replace filter",
            30,
            IntervalUnit::Days,
            date(2024, 1, 1),
        ));
        Workshop::new("w1", "Line A").with_equipment_added(pump)
    }

    #[test]
    fn helpers_leave_receiver_untouched() {
        let original = sample();
        let trimmed = original.without_equipment("e1");

        assert_eq!(original.equipment.len(), 1);
        assert!(trimmed.equipment.is_empty());
        assert_eq!(original.task_count(), 1);
    }

    #[test]
    fn replace_equipment_ignores_unknown_id() {
        let original = sample();
        let replaced = original.with_equipment_replaced(Equipment::new("missing", "Other"));
        assert_eq!(replaced, original);
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let mut workshop = sample();
        workshop.equipment[0].tasks[0].maintenance_interval = 0;
        let err = workshop.validate().expect_err("zero interval must fail");
        assert_eq!(
            err,
            ModelValidationError::ZeroInterval {
                task_id: "t1".to_string()
            }
        );
    }

    #[test]
    fn serializes_with_camel_case_task_fields() {
        let json = serde_json::to_string(&sample()).expect("serialize workshop");
        assert!(json.contains("\"maintenanceInterval\":30"));
        assert!(json.contains("\"intervalUnit\":\"days\""));
        assert!(json.contains("\"lastMaintenanceDate\":\"2024-01-01\""));
    }

    #[test]
    fn without_task_drops_only_matching_id() {
        let equip = sample().equipment[0].with_task_added(MaintenanceTask::new(
            "t2",
            "Check seals",
            2,
            IntervalUnit::Months,
            date(2024, 1, 31),
        ));
        let trimmed = equip.without_task("t1");

        assert_eq!(trimmed.tasks.len(), 1);
        assert_eq!(trimmed.tasks[0].id, "t2");
        assert!(trimmed.find_task("t1").is_none());
        assert_eq!(IntervalUnit::Months.as_str(), "months");
    }
}
