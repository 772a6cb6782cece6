//! Time entry repository implementation
//!
//! Reads join the owning user, task and project so callers get display names
//! alongside the raw row.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use timesync_core::tracking::ports::TimeEntryRepository;
use timesync_domain::{
    NewTimeEntry, Result as DomainResult, TimeEntry, TimeEntryRecord, TimeSyncError,
};
use tracing::debug;

use super::connection::{millis_column, to_millis, ConnectionSource, SqlResultExt};
use super::manager::DbManager;

const SELECT_RECORD: &str = "
    SELECT e.entry_id, e.user_id, e.task_id, e.start_time, e.end_time, e.external_id,
           u.full_name, t.name, p.name
    FROM time_entries e
    LEFT JOIN users u ON u.user_id = e.user_id
    LEFT JOIN tasks t ON t.task_id = e.task_id
    LEFT JOIN projects p ON p.project_id = t.project_id";

/// SQLite-backed time entry repository
#[derive(Debug, Clone)]
pub struct SqliteTimeEntryRepository {
    source: ConnectionSource,
}

impl SqliteTimeEntryRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { source: ConnectionSource::Pooled(db) }
    }

    pub(crate) fn scoped(source: ConnectionSource) -> Self {
        Self { source }
    }
}

#[async_trait]
impl TimeEntryRepository for SqliteTimeEntryRepository {
    async fn get_by_id(&self, entry_id: i64) -> DomainResult<Option<TimeEntryRecord>> {
        self.source
            .run(move |conn| {
                conn.query_row(
                    &format!("{SELECT_RECORD} WHERE e.entry_id = ?1"),
                    params![entry_id],
                    map_record_row,
                )
                .optional()
                .map_db_err()
            })
            .await
    }

    async fn get_by_user(&self, user_id: i64) -> DomainResult<Vec<TimeEntryRecord>> {
        self.source
            .run(move |conn| {
                let mut stmt = conn
                    .prepare(&format!(
                        "{SELECT_RECORD} WHERE e.user_id = ?1 ORDER BY e.start_time, e.entry_id"
                    ))
                    .map_db_err()?;
                let rows = stmt.query_map(params![user_id], map_record_row).map_db_err()?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_db_err()
            })
            .await
    }

    async fn get_by_date_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<TimeEntryRecord>> {
        let (from_ms, to_ms) = (to_millis(from), to_millis(to));
        self.source
            .run(move |conn| {
                let mut stmt = conn
                    .prepare(&format!(
                        "{SELECT_RECORD}
                         WHERE e.start_time >= ?1 AND e.end_time <= ?2
                         ORDER BY e.start_time, e.entry_id"
                    ))
                    .map_db_err()?;
                let rows = stmt.query_map(params![from_ms, to_ms], map_record_row).map_db_err()?;
                let records = rows.collect::<rusqlite::Result<Vec<_>>>().map_db_err()?;
                debug!(from_ms, to_ms, count = records.len(), "Loaded time entries in range");
                Ok(records)
            })
            .await
    }

    async fn add(&self, entry: NewTimeEntry) -> DomainResult<TimeEntry> {
        self.source
            .run(move |conn| {
                conn.execute(
                    "INSERT INTO time_entries (user_id, task_id, start_time, end_time)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        entry.user_id,
                        entry.task_id,
                        to_millis(entry.start_time),
                        to_millis(entry.end_time)
                    ],
                )
                .map_db_err()?;
                Ok(TimeEntry {
                    entry_id: conn.last_insert_rowid(),
                    user_id: entry.user_id,
                    task_id: entry.task_id,
                    start_time: entry.start_time,
                    end_time: entry.end_time,
                    external_id: None,
                })
            })
            .await
    }

    async fn update(&self, entry: &TimeEntry) -> DomainResult<()> {
        let entry = entry.clone();
        self.source
            .run(move |conn| {
                let changed = conn
                    .execute(
                        "UPDATE time_entries
                         SET user_id = ?2, task_id = ?3, start_time = ?4, end_time = ?5,
                             external_id = ?6
                         WHERE entry_id = ?1",
                        params![
                            entry.entry_id,
                            entry.user_id,
                            entry.task_id,
                            to_millis(entry.start_time),
                            to_millis(entry.end_time),
                            entry.external_id
                        ],
                    )
                    .map_db_err()?;
                if changed == 0 {
                    return Err(TimeSyncError::NotFound(format!(
                        "Time entry {} not found",
                        entry.entry_id
                    )));
                }
                Ok(())
            })
            .await
    }
}

fn map_record_row(row: &Row<'_>) -> rusqlite::Result<TimeEntryRecord> {
    Ok(TimeEntryRecord {
        entry_id: row.get(0)?,
        user_id: row.get(1)?,
        task_id: row.get(2)?,
        start_time: millis_column(row, 3)?,
        end_time: millis_column(row, 4)?,
        external_id: row.get(5)?,
        user_name: row.get(6)?,
        task_name: row.get(7)?,
        project_name: row.get(8)?,
    })
}
