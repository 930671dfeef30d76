use chrono::{Days, NaiveDate, TimeZone, Utc};
use maintrack_core::schedule::compliance::annotate_history;
use maintrack_core::schedule::upcoming::{summarize, upcoming_tasks};
use maintrack_core::{
    CompletionCompliance, Equipment, HistoryEntry, IntervalUnit, MaintenanceTask, ScheduleStatus,
    StatusPolicy, Workshop,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

fn days_ago(days: u64) -> NaiveDate {
    today().checked_sub_days(Days::new(days)).unwrap()
}

fn daily_task(id: &str, interval: u32, last: NaiveDate) -> MaintenanceTask {
    MaintenanceTask::new(id, format!("Task {id}"), interval, IntervalUnit::Days, last)
}

/// Two workshops whose tasks land on known `days_remaining` values.
fn plant() -> Vec<Workshop> {
    let press = Equipment::new("E1", "Press")
        .with_task_added(daily_task("A", 10, days_ago(5))) // 5
        .with_task_added(daily_task("B", 10, days_ago(15))) // -5
        .with_task_added(daily_task("C", 60, days_ago(1))); // 59, ok
    let mixer = Equipment::new("E2", "Mixer")
        .with_task_added(daily_task("D", 10, days_ago(5))) // 5, ties with A
        .with_task_added(daily_task("E", 7, days_ago(7))); // 0
    let dryer = Equipment::new("E3", "Dryer")
        .with_task_added(daily_task("F", 3, days_ago(8))) // -5, ties with B
        .with_task_added(daily_task("G", 14, days_ago(7))); // 7
    vec![
        Workshop::new("W1", "Granulation")
            .with_equipment_added(press)
            .with_equipment_added(mixer),
        Workshop::new("W2", "Drying").with_equipment_added(dryer),
    ]
}

#[test]
fn upcoming_tasks_sorted_by_urgency_with_stable_ties() {
    let tasks = upcoming_tasks(&plant(), today(), &StatusPolicy::default());

    let ids: Vec<&str> = tasks.iter().map(|task| task.task_id.as_str()).collect();
    assert_eq!(ids, vec!["B", "F", "E", "A", "D", "G"]);

    let days: Vec<i64> = tasks.iter().map(|task| task.days_remaining).collect();
    assert_eq!(days, vec![-5, -5, 0, 5, 5, 7]);
    assert!(days.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn upcoming_window_edges_are_inclusive() {
    let tasks = upcoming_tasks(&plant(), today(), &StatusPolicy::default());

    let due_today = tasks.iter().find(|task| task.task_id == "E").unwrap();
    assert_eq!(due_today.status, ScheduleStatus::Upcoming);
    let due_in_week = tasks.iter().find(|task| task.task_id == "G").unwrap();
    assert_eq!(due_in_week.status, ScheduleStatus::Upcoming);
    assert!(tasks.iter().all(|task| task.task_id != "C"));
}

#[test]
fn upcoming_entries_carry_names_and_ids() {
    let tasks = upcoming_tasks(&plant(), today(), &StatusPolicy::default());
    let f = tasks.iter().find(|task| task.task_id == "F").unwrap();

    assert_eq!(f.workshop_id, "W2");
    assert_eq!(f.equipment_id, "E3");
    assert_eq!(f.workshop_name, "Drying");
    assert_eq!(f.equipment_name, "Dryer");
    assert_eq!(f.task_name, "Task F");
    assert_eq!(f.status, ScheduleStatus::Overdue);
}

#[test]
fn empty_hierarchy_produces_empty_projections() {
    assert!(upcoming_tasks(&[], today(), &StatusPolicy::default()).is_empty());
    assert_eq!(summarize(&[], today(), &StatusPolicy::default()).total, 0);
}

#[test]
fn summary_counts_every_task() {
    let summary = summarize(&plant(), today(), &StatusPolicy::default());
    assert_eq!(summary.overdue, 2);
    assert_eq!(summary.upcoming, 4);
    assert_eq!(summary.ok, 1);
    assert_eq!(summary.total, 7);
}

#[test]
fn month_interval_clamps_at_month_end() {
    let task = MaintenanceTask::new(
        "M",
        "Calibrate scale",
        1,
        IntervalUnit::Months,
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
    );
    let workshops = vec![Workshop::new("W1", "Lab")
        .with_equipment_added(Equipment::new("E1", "Scale").with_task_added(task))];

    let on_feb_29 = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let tasks = upcoming_tasks(&workshops, on_feb_29, &StatusPolicy::default());
    assert_eq!(tasks[0].due_date, on_feb_29);
    assert_eq!(tasks[0].days_remaining, 0);
}

fn completion(id: &str, task_id: &str, date: NaiveDate) -> HistoryEntry {
    HistoryEntry {
        id: id.to_string(),
        workshop_id: "W1".to_string(),
        equipment_id: "E1".to_string(),
        task_id: task_id.to_string(),
        workshop_name: "Granulation".to_string(),
        equipment_name: "Press".to_string(),
        task_name: format!("Task {task_id}"),
        maintenance_date: date,
        original_completion_date: Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap(),
        edit_count: 0,
        notes: None,
    }
}

#[test]
fn annotate_history_flags_late_completions() {
    // Task A has a 10-day interval.
    let history = vec![
        completion("h1", "A", days_ago(40)),
        completion("h2", "A", days_ago(28)), // due 30 days ago, 2 late
        completion("h3", "A", days_ago(20)), // due 18 days ago, on time
        completion("h4", "Z", days_ago(3)),  // task no longer exists
    ];

    let annotated = annotate_history(&plant(), &history);
    let summary: Vec<(&str, CompletionCompliance, i64)> = annotated
        .iter()
        .map(|item| (item.entry.id.as_str(), item.compliance, item.overdue_days))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("h1", CompletionCompliance::OnTime, 0),
            ("h2", CompletionCompliance::Late, 2),
            ("h3", CompletionCompliance::OnTime, 0),
            ("h4", CompletionCompliance::Unknown, 0),
        ]
    );
}

#[test]
fn annotate_history_orders_by_completion_date_not_log_position() {
    // Logged out of order after a date correction.
    let history = vec![
        completion("late", "A", days_ago(10)),
        completion("early", "A", days_ago(30)),
    ];

    let annotated = annotate_history(&plant(), &history);
    assert_eq!(annotated[0].entry.id, "late");
    assert_eq!(annotated[0].compliance, CompletionCompliance::Late);
    assert_eq!(annotated[0].overdue_days, 10);
    assert_eq!(annotated[1].compliance, CompletionCompliance::OnTime);
}
