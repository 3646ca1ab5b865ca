use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Document;

/// One clock-in/clock-out period; at most one per employee per local day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkSession {
    pub id: String,
    pub user_id: String,
    pub work_date: NaiveDate,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_half_day: bool,
    #[serde(default)]
    pub total_break_seconds: i64,
    #[serde(default)]
    pub effective_seconds: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Document for WorkSession {
    const COLLECTION: &'static str = "sessions";
    const LABEL: &'static str = "Session";
}

impl WorkSession {
    pub fn start(user_id: &str, work_date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            id: super::new_id(),
            user_id: user_id.to_string(),
            work_date,
            start_time: now,
            end_time: None,
            is_half_day: false,
            total_break_seconds: 0,
            effective_seconds: 0,
            notes: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Break {
    pub id: String,
    pub session_id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl Document for Break {
    const COLLECTION: &'static str = "breaks";
    const LABEL: &'static str = "Break";
}

impl Break {
    pub fn start(session_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: super::new_id(),
            session_id: session_id.to_string(),
            start_time: now,
            end_time: None,
        }
    }
}

crate::string_enum!(TimesheetStatus, "status" {
    Completed => "Completed",
    Ongoing => "Ongoing",
    Blocked => "Blocked",
});

/// End-of-day work report attached to a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timesheet {
    pub id: String,
    pub session_id: String,
    #[serde(default)]
    pub user_id: String,
    pub task_id: String,
    pub work_description: String,
    pub status: TimesheetStatus,
    pub submitted_at: DateTime<Utc>,
}

impl Document for Timesheet {
    const COLLECTION: &'static str = "timesheets";
    const LABEL: &'static str = "Timesheet";
}
