//! User repository implementation

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use timesync_core::catalog::ports::UserRepository;
use timesync_domain::{NewUser, Result as DomainResult, User};

use super::connection::{ConnectionSource, SqlResultExt};
use super::manager::DbManager;

/// SQLite-backed user repository
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    source: ConnectionSource,
}

impl SqliteUserRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { source: ConnectionSource::Pooled(db) }
    }

    pub(crate) fn scoped(source: ConnectionSource) -> Self {
        Self { source }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn get_by_id(&self, user_id: i64) -> DomainResult<Option<User>> {
        self.source.run(move |conn| query_user(conn, user_id)).await
    }

    async fn get_all(&self) -> DomainResult<Vec<User>> {
        self.source
            .run(|conn| {
                let mut stmt = conn
                    .prepare("SELECT user_id, full_name FROM users ORDER BY user_id")
                    .map_db_err()?;
                let users = stmt.query_map([], map_user_row).map_db_err()?;
                users.collect::<rusqlite::Result<Vec<_>>>().map_db_err()
            })
            .await
    }

    async fn add(&self, user: NewUser) -> DomainResult<User> {
        self.source
            .run(move |conn| {
                let full_name = user.full_name.trim().to_string();
                conn.execute("INSERT INTO users (full_name) VALUES (?1)", params![full_name])
                    .map_db_err()?;
                Ok(User { user_id: conn.last_insert_rowid(), full_name })
            })
            .await
    }
}

fn query_user(conn: &Connection, user_id: i64) -> DomainResult<Option<User>> {
    conn.query_row(
        "SELECT user_id, full_name FROM users WHERE user_id = ?1",
        params![user_id],
        map_user_row,
    )
    .optional()
    .map_db_err()
}

pub(crate) fn map_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User { user_id: row.get(0)?, full_name: row.get(1)? })
}
