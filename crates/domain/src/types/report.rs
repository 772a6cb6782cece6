//! Rows of the time-entry export

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::sync::TimeEntryRecord;

const UNKNOWN: &str = "Unknown";

/// One line of an exported report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub user: String,
    pub project: String,
    pub task: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub hours: f64,
}

impl From<&TimeEntryRecord> for ReportRow {
    fn from(record: &TimeEntryRecord) -> Self {
        let name = |value: &Option<String>| {
            value.as_deref().filter(|v| !v.trim().is_empty()).unwrap_or(UNKNOWN).to_string()
        };

        Self {
            user: name(&record.user_name),
            project: name(&record.project_name),
            task: name(&record.task_name),
            start_time: record.start_time,
            end_time: record.end_time,
            hours: record.hours(),
        }
    }
}
