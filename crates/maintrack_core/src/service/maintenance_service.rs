//! Maintenance use-case service.
//!
//! # Responsibility
//! - Gate mutations on the caller's role.
//! - Load state, apply a ledger mutation, persist the full result.
//! - Serve read projections (status, attention list, annotated history).
//!
//! # Invariants
//! - Identity is passed explicitly into every mutation; no session state.
//! - Skipped mutations never write to the store.
//! - Task completion persists hierarchy and history in one transaction.

use crate::access::{role_for, EditorPolicy, Role};
use crate::ledger::{self, CompletionRequest, LedgerState, Mutation, MutationOutcome, SkipReason};
use crate::model::history::HistoryEntry;
use crate::model::workshop::Workshop;
use crate::repo::record_store::{
    encode_record, load_or_default, save, RecordStore, RepoError, HISTORY_KEY, WORKSHOPS_KEY,
};
use crate::schedule::compliance::{annotate_history, HistoryEntryWithStatus};
use crate::schedule::status::{task_status, StatusPolicy, TaskStatusDetails};
use crate::schedule::upcoming::{summarize, upcoming_tasks, StatusSummary, UpcomingTask};
use crate::service::context::{Clock, IdGenerator};
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, MaintenanceServiceError>;

/// Service error for maintenance use-cases.
///
/// Only storage transport failures surface here; domain no-ops are reported
/// through `MutationOutcome`.
#[derive(Debug)]
pub enum MaintenanceServiceError {
    Repo(RepoError),
}

impl Display for MaintenanceServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MaintenanceServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for MaintenanceServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Maintenance service facade over a record store and collaborators.
pub struct MaintenanceService<S, C, G, P>
where
    S: RecordStore,
    C: Clock,
    G: IdGenerator,
    P: EditorPolicy,
{
    store: S,
    clock: C,
    ids: G,
    editors: P,
    status_policy: StatusPolicy,
}

impl<S, C, G, P> MaintenanceService<S, C, G, P>
where
    S: RecordStore,
    C: Clock,
    G: IdGenerator,
    P: EditorPolicy,
{
    /// Creates a service with the default status policy.
    pub fn new(store: S, clock: C, ids: G, editors: P) -> Self {
        Self {
            store,
            clock,
            ids,
            editors,
            status_policy: StatusPolicy::default(),
        }
    }

    /// Overrides the upcoming-window policy.
    pub fn with_status_policy(mut self, status_policy: StatusPolicy) -> Self {
        self.status_policy = status_policy;
        self
    }

    pub fn status_policy(&self) -> &StatusPolicy {
        &self.status_policy
    }

    /// Resolves the role of `identity`. Not a security check.
    pub fn role(&self, identity: Option<&str>) -> Role {
        role_for(&self.editors, identity)
    }

    /// Loads hierarchy and history; corrupt blobs load as empty.
    pub fn load_state(&self) -> ServiceResult<LedgerState> {
        Ok(LedgerState {
            workshops: load_or_default(&self.store, WORKSHOPS_KEY)?,
            history: load_or_default(&self.store, HISTORY_KEY)?,
        })
    }

    pub fn workshops(&self) -> ServiceResult<Vec<Workshop>> {
        Ok(load_or_default(&self.store, WORKSHOPS_KEY)?)
    }

    /// History in log order (oldest first).
    pub fn history(&self) -> ServiceResult<Vec<HistoryEntry>> {
        Ok(load_or_default(&self.store, HISTORY_KEY)?)
    }

    /// Overdue and upcoming tasks as of the clock's today, most urgent first.
    pub fn upcoming_tasks(&self) -> ServiceResult<Vec<UpcomingTask>> {
        let workshops = self.workshops()?;
        Ok(upcoming_tasks(
            &workshops,
            self.clock.today(),
            &self.status_policy,
        ))
    }

    pub fn status_summary(&self) -> ServiceResult<StatusSummary> {
        let workshops = self.workshops()?;
        Ok(summarize(&workshops, self.clock.today(), &self.status_policy))
    }

    /// Status of one task, or `None` when the id path does not resolve.
    pub fn task_status(
        &self,
        workshop_id: &str,
        equipment_id: &str,
        task_id: &str,
    ) -> ServiceResult<Option<TaskStatusDetails>> {
        let workshops = self.workshops()?;
        let details = workshops
            .iter()
            .find(|workshop| workshop.id == workshop_id)
            .and_then(|workshop| workshop.find_equipment(equipment_id))
            .and_then(|equip| equip.find_task(task_id))
            .map(|task| task_status(task, self.clock.today(), &self.status_policy));
        Ok(details)
    }

    /// History annotated with on-time/late compliance, in log order.
    pub fn annotated_history(&self) -> ServiceResult<Vec<HistoryEntryWithStatus>> {
        let state = self.load_state()?;
        Ok(annotate_history(&state.workshops, &state.history))
    }

    /// Appends a new empty workshop.
    pub fn add_workshop(
        &self,
        identity: &str,
        name: &str,
    ) -> ServiceResult<Mutation<Vec<Workshop>>> {
        let workshops = self.workshops()?;
        if let Some(denied) = self.deny_viewer(identity, "workshop_add", &workshops) {
            return Ok(denied);
        }
        let id = self.ids.next_id();
        let result = ledger::add_workshop(&workshops, id.clone(), name);
        self.persist_workshops("workshop_add", &id, &result)?;
        Ok(result)
    }

    /// Replaces a workshop by id with the given full value.
    pub fn update_workshop(
        &self,
        identity: &str,
        workshop: Workshop,
    ) -> ServiceResult<Mutation<Vec<Workshop>>> {
        let workshops = self.workshops()?;
        if let Some(denied) = self.deny_viewer(identity, "workshop_update", &workshops) {
            return Ok(denied);
        }
        let id = workshop.id.clone();
        let result = ledger::update_workshop(&workshops, workshop);
        self.persist_workshops("workshop_update", &id, &result)?;
        Ok(result)
    }

    /// Removes a workshop by id.
    pub fn delete_workshop(
        &self,
        identity: &str,
        workshop_id: &str,
    ) -> ServiceResult<Mutation<Vec<Workshop>>> {
        let workshops = self.workshops()?;
        if let Some(denied) = self.deny_viewer(identity, "workshop_delete", &workshops) {
            return Ok(denied);
        }
        let result = ledger::delete_workshop(&workshops, workshop_id);
        self.persist_workshops("workshop_delete", workshop_id, &result)?;
        Ok(result)
    }

    /// Records a completion and appends a history entry.
    pub fn complete_maintenance(
        &self,
        identity: &str,
        request: &CompletionRequest,
    ) -> ServiceResult<Mutation<LedgerState>> {
        let state = self.load_state()?;
        if let Some(denied) = self.deny_viewer(identity, "maintenance_complete", &state) {
            return Ok(denied);
        }

        let entry_id = self.ids.next_id();
        let result = ledger::complete_maintenance(&state, request, entry_id, self.clock.now());
        match result.outcome {
            MutationOutcome::Applied => {
                let workshops_blob = encode_record(WORKSHOPS_KEY, &result.value.workshops)?;
                let history_blob = encode_record(HISTORY_KEY, &result.value.history)?;
                self.store.write_blobs(&[
                    (WORKSHOPS_KEY, workshops_blob),
                    (HISTORY_KEY, history_blob),
                ])?;
                info!(
                    "event=maintenance_complete module=service status=ok task_id={} completion_date={} history_len={}",
                    request.task_id,
                    request.completion_date,
                    result.value.history.len()
                );
            }
            MutationOutcome::Skipped(reason) => {
                log_skip("maintenance_complete", &request.task_id, reason)
            }
        }
        Ok(result)
    }

    /// Corrects a history entry's date; capped at two corrections.
    pub fn update_history(
        &self,
        identity: &str,
        history_id: &str,
        new_date: NaiveDate,
    ) -> ServiceResult<Mutation<Vec<HistoryEntry>>> {
        let history = self.history()?;
        if let Some(denied) = self.deny_viewer(identity, "history_update", &history) {
            return Ok(denied);
        }
        let result = ledger::update_history(&history, history_id, new_date);
        match result.outcome {
            MutationOutcome::Applied => {
                save(&self.store, HISTORY_KEY, &result.value)?;
                info!(
                    "event=history_update module=service status=ok history_id={} new_date={}",
                    history_id, new_date
                );
            }
            MutationOutcome::Skipped(reason) => log_skip("history_update", history_id, reason),
        }
        Ok(result)
    }

    fn deny_viewer<T: Clone>(
        &self,
        identity: &str,
        event: &str,
        current: &T,
    ) -> Option<Mutation<T>> {
        if self.role(Some(identity)).can_mutate() {
            return None;
        }
        log_skip(event, "-", SkipReason::PermissionDenied);
        Some(Mutation::skipped(
            current.clone(),
            SkipReason::PermissionDenied,
        ))
    }

    fn persist_workshops(
        &self,
        event: &str,
        target_id: &str,
        result: &Mutation<Vec<Workshop>>,
    ) -> ServiceResult<()> {
        match result.outcome {
            MutationOutcome::Applied => {
                save(&self.store, WORKSHOPS_KEY, &result.value)?;
                info!(
                    "event={} module=service status=ok target_id={} workshop_count={}",
                    event,
                    target_id,
                    result.value.len()
                );
            }
            MutationOutcome::Skipped(reason) => log_skip(event, target_id, reason),
        }
        Ok(())
    }
}

fn log_skip(event: &str, target_id: &str, reason: SkipReason) {
    info!(
        "event={} module=service status=skipped target_id={} reason={}",
        event, target_id, reason
    );
}
