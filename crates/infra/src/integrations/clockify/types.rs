//! Clockify wire types

use serde::{Deserialize, Serialize};
use timesync_domain::constants::WIRE_TIMESTAMP_FORMAT;
use timesync_domain::TimeEntryRecord;

/// Body of `POST /workspaces/{workspaceId}/time-entries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockifyTimeEntryRequest {
    pub start: String,
    pub end: String,
    pub description: String,
}

impl From<&TimeEntryRecord> for ClockifyTimeEntryRequest {
    fn from(entry: &TimeEntryRecord) -> Self {
        Self {
            start: entry.start_time.format(WIRE_TIMESTAMP_FORMAT).to_string(),
            end: entry.end_time.format(WIRE_TIMESTAMP_FORMAT).to_string(),
            description: format!(
                "Task: {} - Project: {}",
                entry.task_name.as_deref().unwrap_or("Unknown"),
                entry.project_name.as_deref().unwrap_or("Unknown")
            ),
        }
    }
}

/// The part of Clockify's response we keep.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClockifyTimeEntryResponse {
    #[serde(default)]
    pub id: Option<String>,
}
