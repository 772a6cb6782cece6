//! Where a repository gets its connection from
//!
//! Standalone repositories borrow a fresh pooled connection per call. Inside a
//! unit of work every scoped repository shares the one connection that holds
//! the open transaction.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::Connection;
use timesync_domain::{Result, TimeSyncError};
use tokio::task;

use super::manager::{DbManager, SqliteConnection};
use crate::errors::IntoDomainError;

#[derive(Clone)]
pub enum ConnectionSource {
    Pooled(Arc<DbManager>),
    Pinned(Arc<Mutex<SqliteConnection>>),
}

impl fmt::Debug for ConnectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pooled(db) => f.debug_tuple("Pooled").field(db).finish(),
            Self::Pinned(_) => f.write_str("Pinned"),
        }
    }
}

impl ConnectionSource {
    /// Run `f` against a connection on the blocking thread pool.
    pub async fn run<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let source = self.clone();
        task::spawn_blocking(move || match source {
            ConnectionSource::Pooled(db) => {
                let conn = db.get_connection()?;
                f(&conn)
            }
            ConnectionSource::Pinned(conn) => {
                let guard = conn.lock();
                f(&guard)
            }
        })
        .await
        .map_err(map_join_error)?
    }
}

pub(crate) fn map_join_error(err: task::JoinError) -> TimeSyncError {
    if err.is_cancelled() {
        TimeSyncError::Internal("blocking database task cancelled".into())
    } else if err.is_panic() {
        TimeSyncError::Internal("blocking database task panicked".into())
    } else {
        TimeSyncError::Internal(format!("blocking database task failed: {err}"))
    }
}

pub(crate) fn to_millis(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

/// Read a millisecond timestamp column.
pub(crate) fn millis_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<DateTime<Utc>> {
    let millis: i64 = row.get(idx)?;
    DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("timestamp out of range: {millis}").into(),
        )
    })
}

pub(crate) trait SqlResultExt<T> {
    /// Convert a rusqlite error into the domain error.
    fn map_db_err(self) -> Result<T>;
}

impl<T> SqlResultExt<T> for rusqlite::Result<T> {
    fn map_db_err(self) -> Result<T> {
        self.map_err(IntoDomainError::into_domain)
    }
}
