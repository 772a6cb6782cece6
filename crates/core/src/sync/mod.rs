//! Provider sync: registry, orchestration and stored-entry sync

pub mod orchestrator;
pub mod ports;
pub mod registry;
pub mod service;

pub use orchestrator::BatchSyncOrchestrator;
pub use ports::{SettingsSource, SyncProvider};
pub use registry::{ProviderConstructor, ProviderRegistration, ProviderRegistry};
pub use service::TimeEntrySyncService;
