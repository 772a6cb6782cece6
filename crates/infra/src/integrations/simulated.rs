//! Provider that accepts every entry without any network I/O

use std::time::Duration;

use async_trait::async_trait;
use timesync_core::SyncProvider;
use timesync_domain::constants::{TOGGL_PROVIDER, TOGGL_SIMULATED_DELAY_MS};
use timesync_domain::{Result, SyncReport, TimeEntryRecord};
use tracing::info;

/// Always succeeds after a fixed per-entry delay.
#[derive(Debug, Clone)]
pub struct SimulatedSyncProvider {
    identity: String,
    delay: Duration,
}

impl SimulatedSyncProvider {
    pub fn new(identity: impl Into<String>) -> Self {
        Self { identity: identity.into(), delay: Duration::from_millis(TOGGL_SIMULATED_DELAY_MS) }
    }

    /// The stand-in Toggl provider.
    pub fn toggl() -> Self {
        Self::new(TOGGL_PROVIDER)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl SyncProvider for SimulatedSyncProvider {
    fn identity(&self) -> &str {
        &self.identity
    }

    async fn sync(&self, entries: &[TimeEntryRecord]) -> Result<SyncReport> {
        for entry in entries {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            info!(
                provider = %self.identity,
                entry_id = entry.entry_id,
                hours = entry.hours(),
                "Simulated time entry sync"
            );
        }
        Ok(SyncReport::simulated(self.identity.clone(), entries))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[tokio::test]
    async fn delivers_every_entry_in_order() {
        let start = Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap();
        let entries: Vec<TimeEntryRecord> = (1..=3)
            .map(|entry_id| TimeEntryRecord {
                entry_id,
                user_id: 1,
                task_id: 1,
                start_time: start,
                end_time: start + chrono::Duration::hours(1),
                user_name: None,
                task_name: None,
                project_name: None,
                external_id: None,
            })
            .collect();

        let provider = SimulatedSyncProvider::toggl().with_delay(Duration::ZERO);
        let report = provider.sync(&entries).await.unwrap();

        assert_eq!(provider.identity(), "Toggl");
        assert!(report.simulated);
        let ids: Vec<i64> = report.delivered.iter().map(|d| d.entry_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
