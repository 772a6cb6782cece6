//! SQLite persistence: connection pool, repositories and unit of work

pub mod assignment_repository;
pub mod connection;
pub mod manager;
pub mod project_repository;
pub mod task_repository;
pub mod time_entry_repository;
pub mod unit_of_work;
pub mod user_repository;

pub use assignment_repository::SqliteAssignmentRepository;
pub use connection::ConnectionSource;
pub use manager::{DbManager, SqliteConnection};
pub use project_repository::SqliteProjectRepository;
pub use task_repository::SqliteTaskRepository;
pub use time_entry_repository::SqliteTimeEntryRepository;
pub use unit_of_work::{SqliteUnitOfWork, SqliteUnitOfWorkFactory};
pub use user_repository::SqliteUserRepository;
