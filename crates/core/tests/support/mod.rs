//! Shared test helpers for `timesync-core` integration tests.
//!
//! These helpers provide reusable fixtures and lightweight mocks so that
//! tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod providers;
pub mod repositories;

use chrono::{DateTime, TimeZone, Utc};
use timesync_domain::TimeEntryRecord;

/// UTC timestamp on 2025-01-06 (a Monday).
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, hour, minute, 0).unwrap()
}

/// A one-hour record starting at `09:00 + entry_id` hours.
pub fn record(entry_id: i64) -> TimeEntryRecord {
    let hour = 9 + u32::try_from(entry_id % 8).unwrap();
    TimeEntryRecord {
        entry_id,
        user_id: 1,
        task_id: 10,
        start_time: at(hour, 0),
        end_time: at(hour + 1, 0),
        user_name: Some("Ada Lovelace".into()),
        task_name: Some("Analytical Engine".into()),
        project_name: Some("Babbage".into()),
        external_id: None,
    }
}
