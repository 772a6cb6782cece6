//! Sync of stored time entries
//!
//! Loads entries from storage, pushes them through the orchestrator and
//! writes the identifiers returned by the provider back to the entries.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use timesync_domain::constants::{
    CLOCKIFY_PROVIDER, MAX_EXTERNAL_ID_LENGTH, PENDING_SYNC_WINDOW_DAYS,
};
use timesync_domain::{
    ConfigCheck, EntrySyncResult, PendingEntry, PendingReview, Result, SyncReport, SyncStatus,
    TimeEntryRecord, TimeSyncError,
};
use tracing::{error, info, warn};

use super::orchestrator::BatchSyncOrchestrator;
use crate::tracking::ports::{TimeEntryRepository, UnitOfWorkFactory};

/// Id of the synthetic entry pushed by a configuration check.
const CONFIG_CHECK_ENTRY_ID: i64 = 999;

/// Syncs persisted time entries to providers
pub struct TimeEntrySyncService {
    orchestrator: Arc<BatchSyncOrchestrator>,
    entries: Arc<dyn TimeEntryRepository>,
    units: Arc<dyn UnitOfWorkFactory>,
    default_provider: String,
}

impl TimeEntrySyncService {
    pub fn new(
        orchestrator: Arc<BatchSyncOrchestrator>,
        entries: Arc<dyn TimeEntryRepository>,
        units: Arc<dyn UnitOfWorkFactory>,
    ) -> Self {
        Self { orchestrator, entries, units, default_provider: CLOCKIFY_PROVIDER.to_string() }
    }

    /// Provider used when a caller does not name one.
    pub fn with_default_provider(mut self, provider: impl Into<String>) -> Self {
        self.default_provider = provider.into();
        self
    }

    /// Provider used when a request names none.
    pub fn default_provider(&self) -> &str {
        &self.default_provider
    }

    /// Sync one user's entries contained in `[from, to]`.
    pub async fn sync_user_entries_in_range(
        &self,
        user_id: i64,
        provider: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<EntrySyncResult> {
        if from > to {
            return Err(TimeSyncError::InvalidInput("'from' must not be after 'to'".into()));
        }

        let records: Vec<TimeEntryRecord> = self
            .entries
            .get_by_date_range(from, to)
            .await?
            .into_iter()
            .filter(|record| record.user_id == user_id)
            .collect();

        info!(
            user_id,
            provider,
            %from,
            %to,
            entries = records.len(),
            "Syncing user time entries"
        );
        self.sync_records(provider, records).await
    }

    /// Entries recorded in the trailing window ending at `now`.
    pub async fn pending_entries(&self, now: DateTime<Utc>) -> Result<Vec<TimeEntryRecord>> {
        let from = now - Duration::days(PENDING_SYNC_WINDOW_DAYS);
        self.entries.get_by_date_range(from, now).await
    }

    /// Sync every entry recorded in the trailing window ending at `now`.
    pub async fn sync_pending(
        &self,
        provider: &str,
        now: DateTime<Utc>,
    ) -> Result<EntrySyncResult> {
        let records = self.pending_entries(now).await?;

        info!(provider, %now, entries = records.len(), "Syncing pending time entries");
        self.sync_records(provider, records).await
    }

    /// List the pending window and, with `auto_sync`, push it to the default provider.
    ///
    /// Storage errors fail the call. A failed push is reported in the review.
    pub async fn review_pending(
        &self,
        now: DateTime<Utc>,
        auto_sync: bool,
    ) -> Result<PendingReview> {
        let records = self.pending_entries(now).await?;
        let items: Vec<PendingEntry> = records.iter().map(PendingEntry::from).collect();
        let mut review = PendingReview {
            count: items.len(),
            synced: false,
            provider: None,
            error: None,
            result: None,
            items,
        };

        if !auto_sync || records.is_empty() {
            info!(entries = review.count, auto_sync, "Listed pending time entries");
            return Ok(review);
        }

        let provider = self.default_provider.clone();
        info!(provider = %provider, entries = review.count, "Auto-syncing pending time entries");
        match self.sync_records(&provider, records).await {
            Ok(result) => {
                review.synced = true;
                review.result = Some(result);
            }
            Err(err) => {
                error!(provider = %provider, error = %err, "Auto-sync of pending entries failed");
                review.error = Some(err.to_string());
            }
        }
        review.provider = Some(provider);
        Ok(review)
    }

    /// Push one synthetic entry ending an hour before `now` to check credentials.
    ///
    /// Nothing is read from or written to storage.
    pub async fn check_provider_config(
        &self,
        provider: &str,
        now: DateTime<Utc>,
    ) -> Result<ConfigCheck> {
        let entry = TimeEntryRecord {
            entry_id: CONFIG_CHECK_ENTRY_ID,
            user_id: 1,
            task_id: 1,
            start_time: now - Duration::hours(2),
            end_time: now - Duration::hours(1),
            user_name: Some("Test User".into()),
            task_name: Some("Test Task".into()),
            project_name: Some("Test Project".into()),
            external_id: None,
        };

        info!(provider, "Checking provider configuration");
        let report =
            self.orchestrator.sync_to_provider(provider, Some(std::slice::from_ref(&entry))).await?;

        Ok(ConfigCheck {
            provider: report.provider.clone(),
            test_entry: PendingEntry::from(&entry),
            report,
        })
    }

    /// Registered providers and the default one.
    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            available_providers: self.orchestrator.get_available_providers(),
            default_provider: self.default_provider.clone(),
        }
    }

    async fn sync_records(
        &self,
        provider: &str,
        records: Vec<TimeEntryRecord>,
    ) -> Result<EntrySyncResult> {
        if records.is_empty() {
            info!(provider, "No time entries to sync");
            return Ok(EntrySyncResult {
                provider: provider.to_string(),
                entries_considered: 0,
                external_ids_saved: 0,
                report: None,
            });
        }

        let report = self.orchestrator.sync_to_provider(provider, Some(&records)).await?;
        let saved = self.persist_external_ids(&records, &report).await?;

        Ok(EntrySyncResult {
            provider: report.provider.clone(),
            entries_considered: records.len(),
            external_ids_saved: saved,
            report: Some(report),
        })
    }

    /// Store external ids returned for delivered entries, in one transaction.
    async fn persist_external_ids(
        &self,
        records: &[TimeEntryRecord],
        report: &SyncReport,
    ) -> Result<usize> {
        let by_id: HashMap<i64, &TimeEntryRecord> =
            records.iter().map(|record| (record.entry_id, record)).collect();

        let mut updates = Vec::new();
        for delivered in &report.delivered {
            let (Some(external_id), Some(record)) =
                (delivered.external_id.as_deref(), by_id.get(&delivered.entry_id))
            else {
                continue;
            };
            if external_id.len() > MAX_EXTERNAL_ID_LENGTH {
                warn!(entry_id = delivered.entry_id, "External id too long, not stored");
                continue;
            }
            if record.external_id.as_deref() == Some(external_id) {
                continue;
            }

            let mut entry = record.to_entry();
            entry.external_id = Some(external_id.to_string());
            updates.push(entry);
        }

        if updates.is_empty() {
            return Ok(0);
        }

        let unit = self.units.begin().await?;
        let repository = unit.time_entries();
        for entry in &updates {
            if let Err(err) = repository.update(entry).await {
                error!(entry_id = entry.entry_id, error = %err, "Failed to store external id");
                if let Err(rollback_err) = unit.rollback().await {
                    error!(error = %rollback_err, "Failed to roll back external id transaction");
                }
                return Err(err);
            }
        }
        unit.commit().await?;

        info!(saved = updates.len(), provider = %report.provider, "Stored external ids");
        Ok(updates.len())
    }
}
