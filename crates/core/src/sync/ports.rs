//! Port interfaces for provider sync

use async_trait::async_trait;
use timesync_domain::{Result, SyncReport, TimeEntryRecord};

/// An external time-tracking system that accepts batches of time entries.
#[async_trait]
pub trait SyncProvider: Send + Sync {
    /// Stable provider name, used as the registry key.
    fn identity(&self) -> &str;

    /// Push a batch of entries.
    ///
    /// Entries are processed in caller order. Failures of individual entries
    /// are recorded in the returned report; an `Err` means the batch as a
    /// whole could not be attempted.
    async fn sync(&self, entries: &[TimeEntryRecord]) -> Result<SyncReport>;
}

/// Read-only string settings looked up by name.
///
/// Providers consult this on every call so credential edits apply without a
/// restart.
pub trait SettingsSource: Send + Sync {
    /// Value for `key`, or `None` when unset.
    fn get(&self, key: &str) -> Option<String>;

    /// Value for `key` with surrounding whitespace removed; blank counts as unset.
    fn get_non_blank(&self, key: &str) -> Option<String> {
        self.get(key).map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
    }
}
