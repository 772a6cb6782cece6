//! External time-tracking providers and the static registration table

pub mod clockify;
pub mod simulated;

use std::sync::Arc;

use timesync_core::{ProviderRegistration, SettingsSource, SyncProvider};
use timesync_domain::constants::{CLOCKIFY_PROVIDER, TOGGL_PROVIDER};
use timesync_domain::{ClockifyConfig, SyncConfig};

pub use clockify::ClockifySyncProvider;
pub use simulated::SimulatedSyncProvider;

/// Providers known to the application, in listing order.
///
/// Constructors run on every resolve, so each sync gets a fresh provider
/// reading the current settings.
pub fn default_registrations(
    settings: Arc<dyn SettingsSource>,
    clockify: &ClockifyConfig,
    sync: &SyncConfig,
) -> Vec<ProviderRegistration> {
    let clockify = clockify.clone();
    let simulate = sync.simulate_when_unconfigured;

    vec![
        ProviderRegistration::new(CLOCKIFY_PROVIDER, move || {
            let provider: Arc<dyn SyncProvider> =
                Arc::new(ClockifySyncProvider::new(Arc::clone(&settings), &clockify, simulate));
            Ok(provider)
        }),
        ProviderRegistration::new(TOGGL_PROVIDER, || {
            let provider: Arc<dyn SyncProvider> = Arc::new(SimulatedSyncProvider::toggl());
            Ok(provider)
        }),
    ]
}
