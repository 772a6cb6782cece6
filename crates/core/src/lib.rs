//! # TimeSync Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits)
//! - The sync provider registry and batch orchestrator
//! - Catalog, time entry and report services
//!
//! ## Architecture Principles
//! - Only depends on `timesync-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod catalog;
pub mod export;
pub mod sync;
pub mod tracking;

// Re-export specific items to avoid ambiguity
pub use catalog::ports::{AssignmentRepository, ProjectRepository, TaskRepository, UserRepository};
pub use catalog::{AssignmentService, ProjectService, TaskService, UserService};
pub use export::ReportExporter;
pub use sync::ports::{SettingsSource, SyncProvider};
pub use sync::{
    BatchSyncOrchestrator, ProviderConstructor, ProviderRegistration, ProviderRegistry,
    TimeEntrySyncService,
};
pub use tracking::ports::{TimeEntryRepository, UnitOfWork, UnitOfWorkFactory};
pub use tracking::TimeEntryService;
