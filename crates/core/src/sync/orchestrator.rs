//! Batch sync orchestration
//!
//! Resolves providers through the [`ProviderRegistry`] and pushes batches to
//! one provider, or fans a batch out to several providers at once.

use std::sync::Arc;

use timesync_domain::constants::DEFAULT_MAX_PARALLEL_PROVIDERS;
use timesync_domain::{
    Result, SyncError, SyncOutcome, SyncReport, SyncState, SyncSummary, TimeEntryRecord,
    TimeSyncError,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::registry::ProviderRegistry;

type TaskList = Vec<(usize, String, JoinHandle<Result<SyncReport>>)>;

/// Coordinates provider resolution and batch delivery.
#[derive(Debug, Clone)]
pub struct BatchSyncOrchestrator {
    registry: Arc<ProviderRegistry>,
    max_parallel: usize,
}

impl BatchSyncOrchestrator {
    /// Orchestrator over `registry` with the default fan-out width.
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry, max_parallel: DEFAULT_MAX_PARALLEL_PROVIDERS }
    }

    /// Limit how many provider syncs run concurrently in a fan-out.
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel.max(1);
        self
    }

    /// Registry providers are resolved from.
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Push `entries` to the provider registered as `provider_name`.
    ///
    /// Validation happens before resolution. Resolution errors are returned
    /// as-is; any error raised by the provider itself is wrapped in
    /// [`SyncError::SyncFailure`]. No retries are attempted.
    pub async fn sync_to_provider(
        &self,
        provider_name: &str,
        entries: Option<&[TimeEntryRecord]>,
    ) -> Result<SyncReport> {
        if provider_name.trim().is_empty() {
            return Err(invalid_argument("provider name is required"));
        }
        let entries = entries.ok_or_else(|| invalid_argument("time entries are required"))?;

        run_provider_sync(&self.registry, provider_name, entries, Uuid::new_v4()).await
    }

    /// Push the same batch to every named provider concurrently.
    ///
    /// Each provider attempt is isolated: errors and panics are captured as
    /// failed outcomes. The summary lists outcomes in request order. Spawned
    /// attempts are detached, so dropping the returned future does not stop
    /// calls already in flight.
    pub async fn sync_to_multiple_providers(
        &self,
        provider_names: Option<&[String]>,
        entries: Option<&[TimeEntryRecord]>,
    ) -> Result<SyncSummary> {
        let provider_names =
            provider_names.ok_or_else(|| invalid_argument("provider names are required"))?;
        let entries = entries.ok_or_else(|| invalid_argument("time entries are required"))?;

        let sync_id = Uuid::new_v4();
        let shared: Arc<[TimeEntryRecord]> = Arc::from(entries.to_vec());

        info!(
            sync_id = %sync_id,
            providers = ?provider_names,
            entries = entries.len(),
            max_parallel = self.max_parallel,
            "Starting multi-provider sync"
        );

        let mut outcomes: Vec<Option<SyncOutcome>> = vec![None; provider_names.len()];
        let mut tasks: TaskList = Vec::new();

        for (idx, name) in provider_names.iter().enumerate() {
            let registry = Arc::clone(&self.registry);
            let batch = Arc::clone(&shared);
            let provider = name.clone();

            tasks.push((
                idx,
                name.clone(),
                tokio::spawn(async move {
                    if provider.trim().is_empty() {
                        return Err(invalid_argument("provider name is required"));
                    }
                    run_provider_sync(&registry, &provider, &batch, sync_id).await
                }),
            ));

            if tasks.len() >= self.max_parallel {
                drain_tasks(&mut tasks, &mut outcomes).await;
            }
        }

        if !tasks.is_empty() {
            drain_tasks(&mut tasks, &mut outcomes).await;
        }

        let summary = SyncSummary::from_outcomes(outcomes.into_iter().flatten().collect());

        info!(
            sync_id = %sync_id,
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Multi-provider sync finished"
        );
        Ok(summary)
    }

    /// Registered provider identities in registration order.
    pub fn get_available_providers(&self) -> Vec<String> {
        self.registry.list_available()
    }
}

async fn drain_tasks(tasks: &mut TaskList, outcomes: &mut [Option<SyncOutcome>]) {
    let mut pending = Vec::new();
    std::mem::swap(tasks, &mut pending);

    for (idx, provider, task) in pending {
        let outcome = match task.await {
            Ok(Ok(report)) => SyncOutcome::succeeded(provider, report),
            Ok(Err(err)) => SyncOutcome::failed(provider, err.to_string()),
            Err(join_err) => {
                warn!(provider = %provider, error = %join_err, "Provider sync task aborted");
                SyncOutcome::failed(provider, format!("Task join error: {join_err}"))
            }
        };
        outcomes[idx] = Some(outcome);
    }
}

async fn run_provider_sync(
    registry: &ProviderRegistry,
    provider_name: &str,
    entries: &[TimeEntryRecord],
    sync_id: Uuid,
) -> Result<SyncReport> {
    let mut call = CallState::new(sync_id, provider_name);

    call.advance(SyncState::Resolving);
    let provider = match registry.resolve(provider_name) {
        Ok(provider) => provider,
        Err(err) => {
            call.advance(SyncState::ResolutionFailed);
            return Err(err.into());
        }
    };
    call.advance(SyncState::Resolved);

    call.advance(SyncState::Syncing);
    match provider.sync(entries).await {
        Ok(report) => {
            call.advance(SyncState::Succeeded);
            info!(
                sync_id = %sync_id,
                provider = %provider.identity(),
                attempted = report.attempted,
                delivered = report.delivered.len(),
                failed = report.failed.len(),
                simulated = report.simulated,
                "Synced time entries to provider"
            );
            Ok(report)
        }
        Err(err) => {
            call.advance(SyncState::Failed);
            warn!(
                sync_id = %sync_id,
                provider = %provider.identity(),
                error = %err,
                "Provider sync failed"
            );
            Err(SyncError::SyncFailure {
                provider: provider.identity().to_string(),
                source: Box::new(err),
            }
            .into())
        }
    }
}

/// Lifecycle tracker for one provider call.
struct CallState<'a> {
    sync_id: Uuid,
    provider: &'a str,
    state: SyncState,
}

impl<'a> CallState<'a> {
    fn new(sync_id: Uuid, provider: &'a str) -> Self {
        Self { sync_id, provider, state: SyncState::Pending }
    }

    fn advance(&mut self, next: SyncState) {
        debug_assert!(self.state.can_transition_to(next), "illegal sync transition");
        debug!(
            sync_id = %self.sync_id,
            provider = %self.provider,
            from = %self.state,
            to = %next,
            "Sync state transition"
        );
        self.state = next;
    }
}

fn invalid_argument(message: &str) -> TimeSyncError {
    SyncError::InvalidArgument(message.to_string()).into()
}
