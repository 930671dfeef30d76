//! Core domain logic for MainTrack, an equipment maintenance tracker.
//! This crate is the single source of truth for scheduling and audit rules.

pub mod access;
pub mod config;
pub mod db;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;

pub use access::{role_for, AllowListPolicy, EditorPolicy, Role};
pub use config::{ConfigError, CoreConfig};
pub use ledger::{CompletionRequest, LedgerState, Mutation, MutationOutcome, SkipReason};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::history::{HistoryEntry, MAX_HISTORY_EDITS};
pub use model::workshop::{Equipment, IntervalUnit, MaintenanceTask, Workshop};
pub use model::{ModelValidationError, RecordId};
pub use repo::record_store::{RecordStore, RepoError, RepoResult, SqliteRecordStore};
pub use schedule::compliance::{CompletionCompliance, HistoryEntryWithStatus};
pub use schedule::status::{ScheduleStatus, StatusPolicy, TaskStatusDetails};
pub use schedule::upcoming::{StatusSummary, UpcomingTask};
pub use service::context::{
    Clock, FixedClock, IdGenerator, SequentialIdGenerator, SystemClock, UuidIdGenerator,
};
pub use service::maintenance_service::{
    MaintenanceService, MaintenanceServiceError, ServiceResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
