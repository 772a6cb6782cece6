//! Transactional unit of work over a single pooled connection

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use timesync_core::catalog::ports::{TaskRepository, UserRepository};
use timesync_core::tracking::ports::{TimeEntryRepository, UnitOfWork, UnitOfWorkFactory};
use timesync_domain::{Result as DomainResult, TimeSyncError};
use tokio::task;
use tracing::{debug, warn};

use super::connection::{map_join_error, ConnectionSource, SqlResultExt};
use super::manager::DbManager;
use super::task_repository::SqliteTaskRepository;
use super::time_entry_repository::SqliteTimeEntryRepository;
use super::user_repository::SqliteUserRepository;

/// Opens SQLite transactions as units of work.
#[derive(Debug, Clone)]
pub struct SqliteUnitOfWorkFactory {
    db: Arc<DbManager>,
}

impl SqliteUnitOfWorkFactory {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnitOfWorkFactory for SqliteUnitOfWorkFactory {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let db = Arc::clone(&self.db);
        let conn = task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            // IMMEDIATE takes the write lock up front so commits cannot hit SQLITE_BUSY
            conn.execute_batch("BEGIN IMMEDIATE").map_db_err()?;
            Ok::<_, TimeSyncError>(conn)
        })
        .await
        .map_err(map_join_error)??;

        debug!("Unit of work started");
        Ok(Box::new(SqliteUnitOfWork {
            source: ConnectionSource::Pinned(Arc::new(Mutex::new(conn))),
            finished: AtomicBool::new(false),
        }))
    }
}

/// An open `BEGIN IMMEDIATE` transaction.
///
/// Dropping it without calling commit or rollback rolls the transaction back.
#[derive(Debug)]
pub struct SqliteUnitOfWork {
    source: ConnectionSource,
    finished: AtomicBool,
}

impl SqliteUnitOfWork {
    async fn finish(&self, statement: &'static str) -> DomainResult<()> {
        self.finished.store(true, Ordering::SeqCst);
        self.source.run(move |conn| conn.execute_batch(statement).map_db_err()).await
    }
}

#[async_trait]
impl UnitOfWork for SqliteUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(SqliteUserRepository::scoped(self.source.clone()))
    }

    fn tasks(&self) -> Arc<dyn TaskRepository> {
        Arc::new(SqliteTaskRepository::scoped(self.source.clone()))
    }

    fn time_entries(&self) -> Arc<dyn TimeEntryRepository> {
        Arc::new(SqliteTimeEntryRepository::scoped(self.source.clone()))
    }

    async fn save_changes(&self) -> DomainResult<()> {
        let violations = self
            .source
            .run(|conn| {
                let mut stmt = conn.prepare("PRAGMA foreign_key_check").map_db_err()?;
                let tables = stmt.query_map([], |row| row.get::<_, String>(0)).map_db_err()?;
                tables.collect::<rusqlite::Result<Vec<_>>>().map_db_err()
            })
            .await?;

        if violations.is_empty() {
            Ok(())
        } else {
            Err(TimeSyncError::InvalidInput(format!(
                "referenced record does not exist (tables: {})",
                violations.join(", ")
            )))
        }
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        if let Err(err) = self.finish("COMMIT").await {
            warn!(error = %err, "Commit failed, rolling back");
            if let Err(rollback_err) =
                self.source.run(|conn| conn.execute_batch("ROLLBACK").map_db_err()).await
            {
                warn!(error = %rollback_err, "Rollback after failed commit also failed");
            }
            return Err(err);
        }
        debug!("Unit of work committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        self.finish("ROLLBACK").await?;
        debug!("Unit of work rolled back");
        Ok(())
    }
}

impl Drop for SqliteUnitOfWork {
    fn drop(&mut self) {
        if self.finished.load(Ordering::SeqCst) {
            return;
        }
        if let ConnectionSource::Pinned(conn) = &self.source {
            if let Err(err) = conn.lock().execute_batch("ROLLBACK") {
                warn!(error = %err, "Failed to roll back abandoned unit of work");
            }
        }
    }
}
