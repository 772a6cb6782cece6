//! Clockify sync provider
//!
//! Credentials are read from the settings source on every call. Without
//! them the provider either simulates delivery or refuses the batch,
//! depending on `simulate_when_unconfigured`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use timesync_core::{SettingsSource, SyncProvider};
use timesync_domain::constants::{
    CLOCKIFY_API_KEY_HEADER, CLOCKIFY_API_KEY_SETTING, CLOCKIFY_PROVIDER,
    CLOCKIFY_SIMULATED_DELAY_MS, CLOCKIFY_WORKSPACE_SETTING,
};
use timesync_domain::{ClockifyConfig, Result, SyncReport, TimeEntryRecord, TimeSyncError};
use tracing::{debug, info, warn};

use super::types::{ClockifyTimeEntryRequest, ClockifyTimeEntryResponse};
use crate::http::HttpClient;

struct Credentials {
    api_key: String,
    workspace_id: String,
}

/// Pushes time entries to the Clockify REST API, one request per entry.
pub struct ClockifySyncProvider {
    settings: Arc<dyn SettingsSource>,
    base_url: String,
    timeout: Duration,
    simulate_when_unconfigured: bool,
    simulated_delay: Duration,
}

impl ClockifySyncProvider {
    pub fn new(
        settings: Arc<dyn SettingsSource>,
        config: &ClockifyConfig,
        simulate_when_unconfigured: bool,
    ) -> Self {
        Self {
            settings,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
            simulate_when_unconfigured,
            simulated_delay: Duration::from_millis(CLOCKIFY_SIMULATED_DELAY_MS),
        }
    }

    /// Per-entry pause used while simulating.
    pub fn with_simulated_delay(mut self, delay: Duration) -> Self {
        self.simulated_delay = delay;
        self
    }

    fn credentials(&self) -> Option<Credentials> {
        let api_key = self.settings.get_non_blank(CLOCKIFY_API_KEY_SETTING);
        let workspace_id = self.settings.get_non_blank(CLOCKIFY_WORKSPACE_SETTING);
        info!(
            provider = CLOCKIFY_PROVIDER,
            api_key = %setting_status(api_key.as_deref()),
            workspace_id = %setting_status(workspace_id.as_deref()),
            "Clockify configuration status"
        );

        Some(Credentials { api_key: api_key?, workspace_id: workspace_id? })
    }

    async fn simulate(&self, entries: &[TimeEntryRecord]) -> SyncReport {
        warn!(
            provider = CLOCKIFY_PROVIDER,
            entries = entries.len(),
            "Clockify credentials not configured, simulating sync"
        );
        for entry in entries {
            if !self.simulated_delay.is_zero() {
                tokio::time::sleep(self.simulated_delay).await;
            }
            info!(
                provider = CLOCKIFY_PROVIDER,
                entry_id = entry.entry_id,
                start = %entry.start_time,
                end = %entry.end_time,
                "Simulated time entry sync"
            );
        }
        SyncReport::simulated(CLOCKIFY_PROVIDER, entries)
    }

    fn client(&self, api_key: &str) -> Result<(HttpClient, HeaderMap)> {
        let client = HttpClient::with_timeout(self.timeout)?;

        let value = HeaderValue::from_str(api_key).map_err(|_| {
            TimeSyncError::Config("Clockify API key contains invalid header characters".into())
        })?;
        let name = HeaderName::from_bytes(CLOCKIFY_API_KEY_HEADER.as_bytes())
            .map_err(|err| TimeSyncError::Internal(format!("invalid header name: {err}")))?;
        let mut headers = HeaderMap::new();
        headers.insert(name, value);

        Ok((client, headers))
    }

    async fn push_entry(
        &self,
        client: &HttpClient,
        url: &str,
        headers: &HeaderMap,
        entry: &TimeEntryRecord,
    ) -> std::result::Result<Option<String>, String> {
        let payload = ClockifyTimeEntryRequest::from(entry);
        let response = client
            .post_json(url, headers.clone(), &payload)
            .await
            .map_err(|err| err.to_string())?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("HTTP {}: {}", status.as_u16(), body.trim()));
        }

        match response.json::<ClockifyTimeEntryResponse>().await {
            Ok(body) => Ok(body.id),
            Err(err) => {
                debug!(
                    entry_id = entry.entry_id,
                    error = %err,
                    "Clockify response had no readable id"
                );
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl SyncProvider for ClockifySyncProvider {
    fn identity(&self) -> &str {
        CLOCKIFY_PROVIDER
    }

    async fn sync(&self, entries: &[TimeEntryRecord]) -> Result<SyncReport> {
        let Some(credentials) = self.credentials() else {
            if self.simulate_when_unconfigured {
                return Ok(self.simulate(entries).await);
            }
            return Err(TimeSyncError::Config(format!(
                "Clockify requires '{CLOCKIFY_API_KEY_SETTING}' and '{CLOCKIFY_WORKSPACE_SETTING}'"
            )));
        };

        let (client, headers) = self.client(&credentials.api_key)?;
        let url = format!("{}/workspaces/{}/time-entries", self.base_url, credentials.workspace_id);
        let mut report = SyncReport::new(CLOCKIFY_PROVIDER);

        for entry in entries {
            match self.push_entry(&client, &url, &headers, entry).await {
                Ok(external_id) => {
                    debug!(
                        entry_id = entry.entry_id,
                        external_id = ?external_id,
                        "Time entry sent to Clockify"
                    );
                    report.record_delivered(entry.entry_id, external_id);
                }
                Err(detail) => {
                    warn!(
                        entry_id = entry.entry_id,
                        error = %detail,
                        "Failed to send time entry to Clockify"
                    );
                    report.record_failure(entry.entry_id, detail);
                }
            }
        }

        info!(
            provider = CLOCKIFY_PROVIDER,
            attempted = report.attempted,
            delivered = report.delivered.len(),
            failed = report.failed.len(),
            "Clockify sync finished"
        );
        Ok(report)
    }
}

/// Credential presence for logs; never the value itself.
fn setting_status(value: Option<&str>) -> String {
    match value {
        Some(value) => format!("SET (length: {})", value.chars().count()),
        None => "NOT SET".to_string(),
    }
}
