//! Project repository implementation

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};
use timesync_core::catalog::ports::ProjectRepository;
use timesync_domain::{NewProject, Project, ProjectDetails, Result as DomainResult};

use super::connection::{ConnectionSource, SqlResultExt};
use super::manager::DbManager;

const SELECT_PROJECT_DETAILS: &str = "
    SELECT p.project_id, p.name, p.user_id, p.external_id, u.full_name
    FROM projects p
    JOIN users u ON u.user_id = p.user_id";

/// SQLite-backed project repository
#[derive(Debug, Clone)]
pub struct SqliteProjectRepository {
    source: ConnectionSource,
}

impl SqliteProjectRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { source: ConnectionSource::Pooled(db) }
    }
}

#[async_trait]
impl ProjectRepository for SqliteProjectRepository {
    async fn get_by_id(&self, project_id: i64) -> DomainResult<Option<ProjectDetails>> {
        self.source
            .run(move |conn| {
                conn.query_row(
                    &format!("{SELECT_PROJECT_DETAILS} WHERE p.project_id = ?1"),
                    params![project_id],
                    map_project_details_row,
                )
                .optional()
                .map_db_err()
            })
            .await
    }

    async fn get_all(&self) -> DomainResult<Vec<ProjectDetails>> {
        self.source
            .run(|conn| {
                let mut stmt = conn
                    .prepare(&format!("{SELECT_PROJECT_DETAILS} ORDER BY p.project_id"))
                    .map_db_err()?;
                let rows = stmt.query_map([], map_project_details_row).map_db_err()?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_db_err()
            })
            .await
    }

    async fn add(&self, project: NewProject) -> DomainResult<Project> {
        self.source
            .run(move |conn| {
                let name = project.name.trim().to_string();
                conn.execute(
                    "INSERT INTO projects (name, user_id) VALUES (?1, ?2)",
                    params![name, project.user_id],
                )
                .map_db_err()?;
                Ok(Project {
                    project_id: conn.last_insert_rowid(),
                    name,
                    user_id: project.user_id,
                    external_id: None,
                })
            })
            .await
    }
}

fn map_project_details_row(row: &Row<'_>) -> rusqlite::Result<ProjectDetails> {
    Ok(ProjectDetails {
        project: Project {
            project_id: row.get(0)?,
            name: row.get(1)?,
            user_id: row.get(2)?,
            external_id: row.get(3)?,
        },
        user_name: row.get(4)?,
    })
}
