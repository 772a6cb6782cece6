//! Time entry service - core business logic

use std::sync::Arc;

use chrono::{DateTime, Utc};
use timesync_domain::{NewTimeEntry, Result, TimeEntryRecord, TimeSyncError};
use tracing::{error, info};

use super::ports::{TimeEntryRepository, UnitOfWork, UnitOfWorkFactory};
use crate::catalog::service::{task_not_found, user_not_found};

/// Records and queries time entries
pub struct TimeEntryService {
    entries: Arc<dyn TimeEntryRepository>,
    units: Arc<dyn UnitOfWorkFactory>,
}

impl TimeEntryService {
    /// Create a new time entry service
    pub fn new(entries: Arc<dyn TimeEntryRepository>, units: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { entries, units }
    }

    /// Record a time entry.
    ///
    /// Runs inside a unit of work: the user and task must exist and the end
    /// must be after the start. Any failure rolls the transaction back.
    pub async fn add_time_entry(&self, entry: NewTimeEntry) -> Result<TimeEntryRecord> {
        info!(user_id = entry.user_id, task_id = entry.task_id, "Creating time entry");

        let unit = self.units.begin().await?;
        match Self::record_in(unit.as_ref(), entry).await {
            Ok(record) => {
                unit.commit().await?;
                info!(entry_id = record.entry_id, "Time entry created");
                Ok(record)
            }
            Err(err) => {
                if let Err(rollback_err) = unit.rollback().await {
                    error!(error = %rollback_err, "Failed to roll back time entry transaction");
                }
                Err(err)
            }
        }
    }

    async fn record_in(unit: &dyn UnitOfWork, entry: NewTimeEntry) -> Result<TimeEntryRecord> {
        if unit.users().get_by_id(entry.user_id).await?.is_none() {
            return Err(user_not_found(entry.user_id));
        }
        if unit.tasks().get_by_id(entry.task_id).await?.is_none() {
            return Err(task_not_found(entry.task_id));
        }
        entry.validate()?;

        let entries = unit.time_entries();
        let created = entries.add(entry).await?;
        unit.save_changes().await?;

        let entry_id = created.entry_id;
        entries.get_by_id(entry_id).await?.ok_or_else(|| {
            TimeSyncError::Internal(format!("Time entry {entry_id} vanished after insert"))
        })
    }

    /// Every entry recorded by `user_id`.
    pub async fn entries_for_user(&self, user_id: i64) -> Result<Vec<TimeEntryRecord>> {
        self.entries.get_by_user(user_id).await
    }

    /// Entries fully contained in `[from, to]`.
    pub async fn entries_in_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TimeEntryRecord>> {
        if from > to {
            return Err(TimeSyncError::InvalidInput("'from' must not be after 'to'".into()));
        }
        self.entries.get_by_date_range(from, to).await
    }
}
