//! Port interfaces for time entry persistence
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use timesync_domain::{NewTimeEntry, Result, TimeEntry, TimeEntryRecord};

use crate::catalog::ports::{TaskRepository, UserRepository};

/// Trait for reading and writing time entries
///
/// Reads return [`TimeEntryRecord`]s joined with user, task and project names.
#[async_trait]
pub trait TimeEntryRepository: Send + Sync {
    async fn get_by_id(&self, entry_id: i64) -> Result<Option<TimeEntryRecord>>;

    async fn get_by_user(&self, user_id: i64) -> Result<Vec<TimeEntryRecord>>;

    /// Entries that start at or after `from` and end at or before `to`.
    async fn get_by_date_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TimeEntryRecord>>;

    async fn add(&self, entry: NewTimeEntry) -> Result<TimeEntry>;

    /// Overwrite the stored row identified by `entry.entry_id`.
    async fn update(&self, entry: &TimeEntry) -> Result<()>;
}

/// Opens units of work.
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>>;
}

/// A transaction with repositories scoped to it.
///
/// Writes made through the scoped repositories become visible to others only
/// after [`commit`](UnitOfWork::commit). Dropping an unfinished unit of work
/// rolls it back.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn tasks(&self) -> Arc<dyn TaskRepository>;

    fn time_entries(&self) -> Arc<dyn TimeEntryRepository>;

    /// Verify pending writes (referential integrity) without ending the transaction.
    async fn save_changes(&self) -> Result<()>;

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}
