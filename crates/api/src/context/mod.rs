//! Application context - composition root
//!
//! Builds the SQLite pool, repositories, provider registry and services once
//! at startup. Handlers share it behind an `Arc`.

use std::sync::Arc;

use timesync_core::{
    AssignmentService, BatchSyncOrchestrator, ProjectService, ProviderRegistry, ReportExporter,
    SettingsSource, TaskService, TimeEntryService, TimeEntrySyncService, UserService,
};
use timesync_domain::{Config, Result, TimeSyncError};
use timesync_infra::database::{
    DbManager, SqliteAssignmentRepository, SqliteProjectRepository, SqliteTaskRepository,
    SqliteTimeEntryRepository, SqliteUnitOfWorkFactory, SqliteUserRepository,
};
use timesync_infra::{default_registrations, LayeredSettings};
use tracing::info;

use crate::utils::health::{ComponentHealth, HealthStatus};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub users: Arc<UserService>,
    pub projects: Arc<ProjectService>,
    pub tasks: Arc<TaskService>,
    pub assignments: Arc<AssignmentService>,
    pub time_entries: Arc<TimeEntryService>,
    pub orchestrator: Arc<BatchSyncOrchestrator>,
    pub entry_sync: Arc<TimeEntrySyncService>,
    pub exporter: Arc<ReportExporter>,
}

impl AppContext {
    /// Wire everything from `config`, reading provider credentials from the
    /// environment first and the config file second.
    pub fn new(config: Config) -> Result<Self> {
        let settings = Arc::new(LayeredSettings::env_then(config.settings.clone()));
        Self::with_settings(config, settings)
    }

    /// Wire everything with an explicit settings source.
    pub fn with_settings(config: Config, settings: Arc<dyn SettingsSource>) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let users = Arc::new(SqliteUserRepository::new(Arc::clone(&db)));
        let projects = Arc::new(SqliteProjectRepository::new(Arc::clone(&db)));
        let tasks = Arc::new(SqliteTaskRepository::new(Arc::clone(&db)));
        let assignments = Arc::new(SqliteAssignmentRepository::new(Arc::clone(&db)));
        let entries = Arc::new(SqliteTimeEntryRepository::new(Arc::clone(&db)));
        let units = Arc::new(SqliteUnitOfWorkFactory::new(Arc::clone(&db)));

        let registry = Arc::new(ProviderRegistry::new(default_registrations(
            settings,
            &config.clockify,
            &config.sync,
        )));
        let orchestrator = Arc::new(
            BatchSyncOrchestrator::new(registry).with_max_parallel(config.sync.max_parallel),
        );

        let context = Self {
            users: Arc::new(UserService::new(users.clone())),
            projects: Arc::new(ProjectService::new(projects.clone(), users.clone())),
            tasks: Arc::new(TaskService::new(tasks.clone(), projects, users.clone())),
            assignments: Arc::new(AssignmentService::new(assignments, tasks, users)),
            time_entries: Arc::new(TimeEntryService::new(entries.clone(), units.clone())),
            entry_sync: Arc::new(TimeEntrySyncService::new(
                Arc::clone(&orchestrator),
                entries.clone(),
                units,
            )),
            exporter: Arc::new(ReportExporter::new(entries)),
            orchestrator,
            db,
            config,
        };

        info!(
            db_path = %context.db.path().display(),
            providers = ?context.orchestrator.get_available_providers(),
            "Application context initialised"
        );
        Ok(context)
    }

    /// Database reachability plus a non-empty provider registry.
    pub async fn health_check(&self) -> HealthStatus {
        let mut status = HealthStatus::new()
            .add_component(self.check_database_health().await)
            .add_component(self.check_provider_health());
        status.calculate_score();
        status
    }

    async fn check_database_health(&self) -> ComponentHealth {
        let db = Arc::clone(&self.db);
        match tokio::task::spawn_blocking(move || db.health_check()).await {
            Ok(Ok(())) => ComponentHealth::healthy("database"),
            Ok(Err(err)) => ComponentHealth::unhealthy("database", err.to_string()),
            Err(err) => ComponentHealth::unhealthy(
                "database",
                TimeSyncError::Internal(format!("health check task failed: {err}")).to_string(),
            ),
        }
    }

    fn check_provider_health(&self) -> ComponentHealth {
        if self.orchestrator.get_available_providers().is_empty() {
            ComponentHealth::unhealthy("providers", "no sync providers registered")
        } else {
            ComponentHealth::healthy("providers")
        }
    }
}
