//! Task repository implementation

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};
use timesync_core::catalog::ports::TaskRepository;
use timesync_domain::{NewTask, Result as DomainResult, Task, TaskDetails};

use super::connection::{ConnectionSource, SqlResultExt};
use super::manager::DbManager;

pub(crate) const SELECT_TASK_DETAILS: &str = "
    SELECT t.task_id, t.name, t.project_id, t.user_id, t.estimate_hours, t.external_id,
           p.name, u.full_name
    FROM tasks t
    JOIN projects p ON p.project_id = t.project_id
    JOIN users u ON u.user_id = t.user_id";

/// SQLite-backed task repository
#[derive(Debug, Clone)]
pub struct SqliteTaskRepository {
    source: ConnectionSource,
}

impl SqliteTaskRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { source: ConnectionSource::Pooled(db) }
    }

    pub(crate) fn scoped(source: ConnectionSource) -> Self {
        Self { source }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn get_by_id(&self, task_id: i64) -> DomainResult<Option<TaskDetails>> {
        self.source
            .run(move |conn| {
                conn.query_row(
                    &format!("{SELECT_TASK_DETAILS} WHERE t.task_id = ?1"),
                    params![task_id],
                    map_task_details_row,
                )
                .optional()
                .map_db_err()
            })
            .await
    }

    async fn get_by_project(&self, project_id: i64) -> DomainResult<Vec<TaskDetails>> {
        self.source
            .run(move |conn| {
                let sql =
                    format!("{SELECT_TASK_DETAILS} WHERE t.project_id = ?1 ORDER BY t.task_id");
                let mut stmt = conn.prepare(&sql).map_db_err()?;
                let rows = stmt.query_map(params![project_id], map_task_details_row).map_db_err()?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_db_err()
            })
            .await
    }

    async fn add(&self, task: NewTask) -> DomainResult<Task> {
        self.source
            .run(move |conn| {
                let name = task.name.trim().to_string();
                conn.execute(
                    "INSERT INTO tasks (name, project_id, user_id, estimate_hours)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![name, task.project_id, task.user_id, task.estimate_hours],
                )
                .map_db_err()?;
                Ok(Task {
                    task_id: conn.last_insert_rowid(),
                    name,
                    project_id: task.project_id,
                    user_id: task.user_id,
                    estimate_hours: task.estimate_hours,
                    external_id: None,
                })
            })
            .await
    }
}

pub(crate) fn map_task_details_row(row: &Row<'_>) -> rusqlite::Result<TaskDetails> {
    Ok(TaskDetails {
        task: Task {
            task_id: row.get(0)?,
            name: row.get(1)?,
            project_id: row.get(2)?,
            user_id: row.get(3)?,
            estimate_hours: row.get(4)?,
            external_id: row.get(5)?,
        },
        project_name: row.get(6)?,
        user_name: row.get(7)?,
    })
}
