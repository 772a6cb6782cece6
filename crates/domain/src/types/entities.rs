//! Persisted entities and their creation payloads

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_NAME_LENGTH;
use crate::{Result, TimeSyncError};

/// A person who records time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub full_name: String,
}

/// A project owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: i64,
    pub name: String,
    pub user_id: i64,
    /// Identifier assigned by an external provider, once synced.
    pub external_id: Option<String>,
}

/// A unit of work inside a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: i64,
    pub name: String,
    pub project_id: i64,
    pub user_id: i64,
    pub estimate_hours: f64,
    pub external_id: Option<String>,
}

/// A recorded work period against a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub entry_id: i64,
    pub user_id: i64,
    pub task_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub external_id: Option<String>,
}

impl TimeEntry {
    /// Length of the work period.
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }
}

/// Link between a user and a task they were assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAssignment {
    pub assignment_id: i64,
    pub user_id: i64,
    pub task_id: i64,
    pub assigned_at: DateTime<Utc>,
}

/// Project joined with its owner's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDetails {
    #[serde(flatten)]
    pub project: Project,
    pub user_name: String,
}

/// Task joined with its project and owner names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDetails {
    #[serde(flatten)]
    pub task: Task,
    pub project_name: String,
    pub user_name: String,
}

// ============================================================================
// Creation payloads
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub name: String,
    pub project_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub estimate_hours: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTimeEntry {
    pub user_id: i64,
    pub task_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAssignment {
    pub user_id: i64,
    pub task_id: i64,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        validate_name("full_name", &self.full_name)
    }
}

impl NewProject {
    pub fn validate(&self) -> Result<()> {
        validate_name("name", &self.name)
    }
}

impl NewTask {
    pub fn validate(&self) -> Result<()> {
        validate_name("name", &self.name)?;
        if !self.estimate_hours.is_finite() || self.estimate_hours < 0.0 {
            return Err(TimeSyncError::InvalidInput(
                "estimate_hours must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}

impl NewTimeEntry {
    /// Rejects periods whose end is not strictly after their start.
    pub fn validate(&self) -> Result<()> {
        if self.end_time <= self.start_time {
            return Err(TimeSyncError::InvalidInput("End time must be after start time".into()));
        }
        Ok(())
    }
}

fn validate_name(field: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TimeSyncError::InvalidInput(format!("{field} is required")));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(TimeSyncError::InvalidInput(format!(
            "{field} must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, hour, 0, 0).unwrap()
    }

    #[test]
    fn time_entry_requires_end_after_start() {
        let entry = NewTimeEntry { user_id: 1, task_id: 1, start_time: at(10), end_time: at(10) };
        assert!(matches!(entry.validate(), Err(TimeSyncError::InvalidInput(_))));

        let entry = NewTimeEntry { user_id: 1, task_id: 1, start_time: at(10), end_time: at(11) };
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn names_must_be_present_and_bounded() {
        assert!(NewUser { full_name: "   ".into() }.validate().is_err());
        assert!(NewUser { full_name: "x".repeat(MAX_NAME_LENGTH + 1) }.validate().is_err());
        assert!(NewUser { full_name: "Ada Lovelace".into() }.validate().is_ok());
    }

    #[test]
    fn negative_estimates_are_rejected() {
        let task =
            NewTask { name: "Design".into(), project_id: 1, user_id: 1, estimate_hours: -1.0 };
        assert!(task.validate().is_err());
    }

    #[test]
    fn duration_is_derived_from_bounds() {
        let entry = TimeEntry {
            entry_id: 1,
            user_id: 1,
            task_id: 1,
            start_time: at(9),
            end_time: at(11),
            external_id: None,
        };
        assert_eq!(entry.duration(), Duration::hours(2));
    }
}
