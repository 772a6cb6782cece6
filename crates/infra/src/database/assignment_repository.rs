//! Task assignment repository implementation

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::params;
use timesync_core::catalog::ports::AssignmentRepository;
use timesync_domain::{NewAssignment, Result as DomainResult, TaskAssignment, TaskDetails, User};

use super::connection::{to_millis, ConnectionSource, SqlResultExt};
use super::manager::DbManager;
use super::task_repository::{map_task_details_row, SELECT_TASK_DETAILS};
use super::user_repository::map_user_row;

/// SQLite-backed user/task assignment repository
#[derive(Debug, Clone)]
pub struct SqliteAssignmentRepository {
    source: ConnectionSource,
}

impl SqliteAssignmentRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { source: ConnectionSource::Pooled(db) }
    }
}

#[async_trait]
impl AssignmentRepository for SqliteAssignmentRepository {
    async fn add(&self, assignment: NewAssignment) -> DomainResult<TaskAssignment> {
        self.source
            .run(move |conn| {
                let assigned_at = Utc::now();
                conn.execute(
                    "INSERT INTO task_assignments (user_id, task_id, assigned_at)
                     VALUES (?1, ?2, ?3)",
                    params![assignment.user_id, assignment.task_id, to_millis(assigned_at)],
                )
                .map_db_err()?;
                Ok(TaskAssignment {
                    assignment_id: conn.last_insert_rowid(),
                    user_id: assignment.user_id,
                    task_id: assignment.task_id,
                    assigned_at,
                })
            })
            .await
    }

    async fn exists(&self, user_id: i64, task_id: i64) -> DomainResult<bool> {
        self.source
            .run(move |conn| {
                conn.query_row(
                    "SELECT EXISTS (
                         SELECT 1 FROM task_assignments WHERE user_id = ?1 AND task_id = ?2
                     )",
                    params![user_id, task_id],
                    |row| row.get::<_, bool>(0),
                )
                .map_db_err()
            })
            .await
    }

    async fn tasks_for_user(&self, user_id: i64) -> DomainResult<Vec<TaskDetails>> {
        self.source
            .run(move |conn| {
                let mut stmt = conn
                    .prepare(&format!(
                        "{SELECT_TASK_DETAILS}
                         JOIN task_assignments a ON a.task_id = t.task_id
                         WHERE a.user_id = ?1
                         ORDER BY t.task_id"
                    ))
                    .map_db_err()?;
                let rows = stmt.query_map(params![user_id], map_task_details_row).map_db_err()?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_db_err()
            })
            .await
    }

    async fn users_for_task(&self, task_id: i64) -> DomainResult<Vec<User>> {
        self.source
            .run(move |conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT u.user_id, u.full_name
                         FROM users u
                         JOIN task_assignments a ON a.user_id = u.user_id
                         WHERE a.task_id = ?1
                         ORDER BY u.user_id",
                    )
                    .map_db_err()?;
                let rows = stmt.query_map(params![task_id], map_user_row).map_db_err()?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_db_err()
            })
            .await
    }
}
