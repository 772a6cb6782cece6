//! Sync transport records and call results
//!
//! These types travel between the orchestrator, providers and callers. None
//! of them are persisted.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::entities::TimeEntry;
use crate::impl_domain_status_conversions;

/// A time entry flattened with the names providers need to describe it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntryRecord {
    pub entry_id: i64,
    pub user_id: i64,
    pub task_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub task_name: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    /// Set once a provider has accepted the entry.
    #[serde(default)]
    pub external_id: Option<String>,
}

impl TimeEntryRecord {
    /// Length of the entry.
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Duration in fractional hours.
    pub fn hours(&self) -> f64 {
        // Saturates beyond ~68 years, far past any real entry.
        let seconds = i32::try_from(self.duration().num_seconds()).unwrap_or(i32::MAX);
        f64::from(seconds) / 3600.0
    }

    /// The persisted entity behind this record.
    pub fn to_entry(&self) -> TimeEntry {
        TimeEntry {
            entry_id: self.entry_id,
            user_id: self.user_id,
            task_id: self.task_id,
            start_time: self.start_time,
            end_time: self.end_time,
            external_id: self.external_id.clone(),
        }
    }
}

/// Entry accepted by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveredEntry {
    pub entry_id: i64,
    /// Identifier returned by the provider, when it returns one.
    pub external_id: Option<String>,
}

/// Entry a provider could not accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFailure {
    pub entry_id: i64,
    pub detail: String,
}

/// Per-entry result of one provider batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub provider: String,
    pub attempted: usize,
    pub delivered: Vec<DeliveredEntry>,
    pub failed: Vec<EntryFailure>,
    /// No outbound call was made; delivery was simulated.
    pub simulated: bool,
}

impl SyncReport {
    /// Empty report for `provider`.
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            attempted: 0,
            delivered: Vec::new(),
            failed: Vec::new(),
            simulated: false,
        }
    }

    /// Report for a batch that was delivered without any network call.
    pub fn simulated(provider: impl Into<String>, entries: &[TimeEntryRecord]) -> Self {
        Self {
            provider: provider.into(),
            attempted: entries.len(),
            delivered: entries
                .iter()
                .map(|entry| DeliveredEntry { entry_id: entry.entry_id, external_id: None })
                .collect(),
            failed: Vec::new(),
            simulated: true,
        }
    }

    /// Count an entry the provider accepted.
    pub fn record_delivered(&mut self, entry_id: i64, external_id: Option<String>) {
        self.attempted += 1;
        self.delivered.push(DeliveredEntry { entry_id, external_id });
    }

    /// Count an entry the provider rejected.
    pub fn record_failure(&mut self, entry_id: i64, detail: impl Into<String>) {
        self.attempted += 1;
        self.failed.push(EntryFailure { entry_id, detail: detail.into() });
    }

    /// True when no entry failed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of one provider attempt inside a fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub provider: String,
    pub success: bool,
    pub error: Option<String>,
    pub report: Option<SyncReport>,
}

impl SyncOutcome {
    pub fn succeeded(provider: impl Into<String>, report: SyncReport) -> Self {
        Self { provider: provider.into(), success: true, error: None, report: Some(report) }
    }

    pub fn failed(provider: impl Into<String>, error: impl Into<String>) -> Self {
        Self { provider: provider.into(), success: false, error: Some(error.into()), report: None }
    }
}

/// A provider that failed in a fan-out, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFailure {
    pub provider: String,
    pub detail: String,
}

/// Aggregate of a multi-provider sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// One outcome per requested provider, in request order.
    pub outcomes: Vec<SyncOutcome>,
    pub failures: Vec<ProviderFailure>,
}

impl SyncSummary {
    /// Tally per-provider outcomes, keeping their order.
    pub fn from_outcomes(outcomes: Vec<SyncOutcome>) -> Self {
        let failures: Vec<ProviderFailure> = outcomes
            .iter()
            .filter(|outcome| !outcome.success)
            .map(|outcome| ProviderFailure {
                provider: outcome.provider.clone(),
                detail: outcome.error.clone().unwrap_or_default(),
            })
            .collect();

        Self {
            total: outcomes.len(),
            succeeded: outcomes.len() - failures.len(),
            failed: failures.len(),
            outcomes,
            failures,
        }
    }
}

/// Lifecycle of a single provider sync call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Pending,
    Resolving,
    Resolved,
    ResolutionFailed,
    Syncing,
    Succeeded,
    Failed,
}

impl_domain_status_conversions!(SyncState {
    Pending => "pending",
    Resolving => "resolving",
    Resolved => "resolved",
    ResolutionFailed => "resolution_failed",
    Syncing => "syncing",
    Succeeded => "succeeded",
    Failed => "failed",
});

impl SyncState {
    /// Whether `next` is a legal successor of this state.
    pub fn can_transition_to(self, next: SyncState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Resolving)
                | (Self::Resolving, Self::Resolved)
                | (Self::Resolving, Self::ResolutionFailed)
                | (Self::Resolved, Self::Syncing)
                | (Self::Syncing, Self::Succeeded)
                | (Self::Syncing, Self::Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::ResolutionFailed)
    }
}

/// Result of syncing stored entries for a user or window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySyncResult {
    pub provider: String,
    pub entries_considered: usize,
    /// External ids written back to storage.
    pub external_ids_saved: usize,
    pub report: Option<SyncReport>,
}

/// Snapshot of what the sync subsystem can do right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    pub available_providers: Vec<String>,
    pub default_provider: String,
}

/// A stored entry awaiting sync, as shown to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingEntry {
    pub entry_id: i64,
    pub user_id: i64,
    pub task_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_hours: f64,
    pub user_name: Option<String>,
    pub task_name: Option<String>,
    pub project_name: Option<String>,
}

impl From<&TimeEntryRecord> for PendingEntry {
    fn from(record: &TimeEntryRecord) -> Self {
        Self {
            entry_id: record.entry_id,
            user_id: record.user_id,
            task_id: record.task_id,
            start_time: record.start_time,
            end_time: record.end_time,
            duration_hours: record.hours(),
            user_name: record.user_name.clone(),
            task_name: record.task_name.clone(),
            project_name: record.project_name.clone(),
        }
    }
}

/// Entries of the pending window, optionally pushed to a provider.
///
/// A failed push still yields a review: `synced` stays false and `error`
/// carries the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingReview {
    pub count: usize,
    pub synced: bool,
    pub provider: Option<String>,
    pub error: Option<String>,
    pub result: Option<EntrySyncResult>,
    pub items: Vec<PendingEntry>,
}

/// Outcome of pushing a synthetic entry to check provider credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigCheck {
    pub provider: String,
    pub test_entry: PendingEntry,
    pub report: SyncReport,
}
