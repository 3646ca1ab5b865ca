//! Work-session time accounting.
//!
//! Everything here is a pure function of the session start, its breaks and
//! "now", so handlers recompute figures on every request.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};
use serde::Serialize;

use crate::models::{Break, Timesheet, WorkSession};

/// Office time zone for a minute offset; out-of-range offsets fall back to UTC
pub fn local_offset(utc_offset_minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60)).unwrap_or(Utc.fix())
}

/// Seconds of break time between `session_start` and `now`.
///
/// Closed breaks count `end - start`, open breaks count up to `now`; each is
/// clipped to the session window.
pub fn total_break_seconds(session_start: DateTime<Utc>, breaks: &[Break], now: DateTime<Utc>) -> i64 {
    breaks
        .iter()
        .map(|b| {
            let start = b.start_time.max(session_start);
            let end = b.end_time.unwrap_or(now).min(now);
            (end - start).num_seconds().max(0)
        })
        .sum()
}

/// Worked seconds excluding breaks, never negative
pub fn effective_seconds(session_start: DateTime<Utc>, breaks: &[Break], now: DateTime<Utc>) -> i64 {
    let elapsed = (now - session_start).num_seconds();
    (elapsed - total_break_seconds(session_start, breaks, now)).max(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkProgress {
    pub effective_seconds: i64,
    pub remaining_seconds: i64,
    pub can_logout: bool,
    pub eta_logout_utc: Option<DateTime<Utc>>,
}

impl WorkProgress {
    pub fn compute(session_start: DateTime<Utc>, breaks: &[Break], now: DateTime<Utc>, required_seconds: i64) -> Self {
        let effective = effective_seconds(session_start, breaks, now);
        let remaining = (required_seconds - effective).max(0);
        Self {
            effective_seconds: effective,
            remaining_seconds: remaining,
            can_logout: effective >= required_seconds,
            eta_logout_utc: (remaining > 0).then(|| now + Duration::seconds(remaining)),
        }
    }
}

/// `"8h 05m"`
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}h {:02}m", seconds / 3600, (seconds % 3600) / 60)
}

/// Local wall-clock time, `"09:30 AM"`
pub fn format_clock(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%I:%M %p").to_string()
}

/// One row of a session history listing
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub date: NaiveDate,
    pub login_time: String,
    pub logout_time: Option<String>,
    pub total_duration: String,
    pub effective_duration: String,
    pub effective_seconds: i64,
    pub break_count: usize,
    pub break_duration: String,
    pub day_type: &'static str,
    pub timesheet_status: &'static str,
    pub task_id: Option<String>,
    pub work_description: Option<String>,
    pub is_active: bool,
}

impl SessionSummary {
    /// Ongoing sessions are measured up to `now`; closed ones use their stored end
    pub fn build(
        session: &WorkSession,
        breaks: &[Break],
        timesheet: Option<&Timesheet>,
        now: DateTime<Utc>,
        offset: FixedOffset,
    ) -> Self {
        let until = session.end_time.unwrap_or(now);
        let effective = match session.end_time {
            Some(_) => session.effective_seconds,
            None => effective_seconds(session.start_time, breaks, now),
        };

        Self {
            id: session.id.clone(),
            date: session.work_date,
            login_time: format_clock(session.start_time, offset),
            logout_time: session.end_time.map(|end| format_clock(end, offset)),
            total_duration: format_duration((until - session.start_time).num_seconds()),
            effective_duration: format_duration(effective),
            effective_seconds: effective,
            break_count: breaks.len(),
            break_duration: format_duration(total_break_seconds(session.start_time, breaks, until)),
            day_type: if session.is_half_day { "Half Day" } else { "Full Day" },
            timesheet_status: if timesheet.is_some() { "Submitted" } else { "Pending" },
            task_id: timesheet.map(|t| t.task_id.clone()),
            work_description: timesheet.map(|t| t.work_description.clone()),
            is_active: session.end_time.is_none(),
        }
    }
}
