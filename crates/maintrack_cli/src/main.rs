//! CLI smoke entry point and attention report.
//!
//! # Responsibility
//! - Verify `maintrack_core` linkage with a deterministic probe.
//! - Print overdue/upcoming tasks for a configured database.
//!
//! Usage: `maintrack_cli [config.json]`. Without a `db_path` in the config
//! only the probe lines are printed.

use log::error;
use maintrack_core::db::open_db;
use maintrack_core::{
    init_logging_from_config, AllowListPolicy, CoreConfig, MaintenanceService, SqliteRecordStore,
    SystemClock, UuidIdGenerator,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("maintrack_core ping={}", maintrack_core::ping());
    println!("maintrack_core version={}", maintrack_core::core_version());

    let config = match std::env::args().nth(1) {
        Some(path) => match CoreConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("config error: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => CoreConfig::default(),
    };

    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("logging disabled: {err}");
    }

    match print_report(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_report module=cli status=error error={err}");
            eprintln!("report failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_report(config: &CoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let Some(db_path) = config.db_path.as_ref() else {
        return Ok(());
    };

    let conn = open_db(db_path)?;
    let service = MaintenanceService::new(
        SqliteRecordStore::try_new(&conn)?,
        SystemClock,
        UuidIdGenerator,
        AllowListPolicy::default(),
    )
    .with_status_policy(config.status_policy());

    let summary = service.status_summary()?;
    println!(
        "tasks total={} overdue={} upcoming={} ok={}",
        summary.total, summary.overdue, summary.upcoming, summary.ok
    );
    for task in service.upcoming_tasks()? {
        println!(
            "{:>5}d  {:<8}  {} / {} / {}  (due {})",
            task.days_remaining,
            task.status.as_str(),
            task.workshop_name,
            task.equipment_name,
            task.task_name,
            task.due_date
        );
    }
    Ok(())
}
