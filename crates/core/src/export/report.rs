//! CSV rendering of time entry reports

use std::sync::Arc;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use timesync_domain::{ReportRow, Result, TimeEntryRecord, TimeSyncError};
use tracing::{debug, info, warn};

use crate::tracking::ports::TimeEntryRepository;

/// Report column headers.
pub const REPORT_COLUMNS: &[&str] =
    &["Date", "User", "Project", "Task", "Start Time", "End Time", "Duration (Hours)"];

/// Renders stored time entries as CSV
pub struct ReportExporter {
    entries: Arc<dyn TimeEntryRepository>,
}

impl ReportExporter {
    /// Exporter reading entries from `entries`.
    pub fn new(entries: Arc<dyn TimeEntryRepository>) -> Self {
        Self { entries }
    }

    /// Report of entries contained in `[from, to]`.
    pub async fn export_range(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<String> {
        if from > to {
            return Err(TimeSyncError::InvalidInput("'from' must not be after 'to'".into()));
        }

        info!(%from, %to, "Exporting time entry report");
        let records = self.entries.get_by_date_range(from, to).await?;
        if records.is_empty() {
            warn!(%from, %to, "No time entries found for report range");
        }

        let csv = render_csv(&records)?;
        info!(entries = records.len(), bytes = csv.len(), "Exported time entry report");
        Ok(csv)
    }

    /// Report of the calendar month containing `now`.
    pub async fn export_month(&self, now: DateTime<Utc>) -> Result<String> {
        let (from, to) = month_bounds(now)?;
        self.export_range(from, to).await
    }
}

/// First instant of the month containing `now` and of the month after it.
pub fn month_bounds(now: DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let (next_year, next_month) =
        if now.month() == 12 { (now.year() + 1, 1) } else { (now.year(), now.month() + 1) };

    let start = Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0).single();
    let end = Utc.with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0).single();
    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(TimeSyncError::Internal(format!("Cannot compute month bounds for {now}"))),
    }
}

/// Render records as CSV, header first.
pub fn render_csv(records: &[TimeEntryRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REPORT_COLUMNS).map_err(csv_error)?;

    for record in records {
        debug!(
            entry_id = record.entry_id,
            user_id = record.user_id,
            task_id = record.task_id,
            "Rendering report row"
        );
        let row = ReportRow::from(record);
        writer
            .write_record([
                row.start_time.format("%Y-%m-%d").to_string(),
                row.user,
                row.project,
                row.task,
                row.start_time.format("%H:%M").to_string(),
                row.end_time.format("%H:%M").to_string(),
                format!("{:.2}", row.hours),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer.into_inner().map_err(csv_error)?;
    String::from_utf8(bytes).map_err(csv_error)
}

fn csv_error(err: impl std::fmt::Display) -> TimeSyncError {
    TimeSyncError::Internal(format!("Failed to write CSV report: {err}"))
}
