use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::models::{Holiday, LeaveRequest, LeaveStatus, LeaveType, WorkSession};

/// Classification of a calendar day, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayType {
    HalfDay,
    Worked,
    Holiday,
    Leave,
    Weekend,
    WorkingDay,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day: u32,
    #[serde(rename = "type")]
    pub day_type: DayType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// First and last day of a month; `None` for an invalid year/month
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next.pred_opt()?))
}

pub fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((NaiveDate::from_ymd_opt(year, 1, 1)?, NaiveDate::from_ymd_opt(year, 12, 31)?))
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn covers(leave: &LeaveRequest, date: NaiveDate) -> bool {
    leave.status == LeaveStatus::Approved && leave.start_date <= date && date <= leave.end_date
}

/// Classifies one day; first matching rule wins
pub fn classify(
    date: NaiveDate,
    sessions: &[WorkSession],
    holidays: &[Holiday],
    leaves: &[LeaveRequest],
) -> (DayType, Option<String>) {
    let day_sessions: Vec<&WorkSession> = sessions.iter().filter(|s| s.work_date == date).collect();
    let day_leaves: Vec<&LeaveRequest> = leaves.iter().filter(|l| covers(l, date)).collect();

    let half_day = day_sessions.iter().any(|s| s.is_half_day)
        || day_leaves.iter().any(|l| l.leave_type == LeaveType::HalfDay);
    if half_day {
        return (DayType::HalfDay, Some(LeaveType::HalfDay.to_string()));
    }
    if !day_sessions.is_empty() {
        return (DayType::Worked, None);
    }
    if let Some(holiday) = holidays.iter().find(|h| h.date == date) {
        return (DayType::Holiday, Some(holiday.name.clone()));
    }
    if let Some(leave) = day_leaves.first() {
        return (DayType::Leave, Some(leave.leave_type.to_string()));
    }
    if is_weekend(date) {
        return (DayType::Weekend, None);
    }
    (DayType::WorkingDay, None)
}

pub fn build_month(
    year: i32,
    month: u32,
    sessions: &[WorkSession],
    holidays: &[Holiday],
    leaves: &[LeaveRequest],
) -> Option<Vec<CalendarDay>> {
    let (first, last) = month_bounds(year, month)?;
    Some(
        first
            .iter_days()
            .take_while(|d| *d <= last)
            .map(|date| {
                let (day_type, name) = classify(date, sessions, holidays, leaves);
                CalendarDay {
                    date,
                    day: date.day(),
                    day_type,
                    name,
                }
            })
            .collect(),
    )
}

/// Approved leave days per month of `year`; a half day weighs 0.5
pub fn leave_days_by_month(leaves: &[LeaveRequest], year: i32) -> [f64; 12] {
    let mut months = [0.0; 12];
    for leave in leaves.iter().filter(|l| l.status == LeaveStatus::Approved) {
        let weight = if leave.leave_type == LeaveType::HalfDay { 0.5 } else { 1.0 };
        for date in leave.start_date.iter_days().take_while(|d| *d <= leave.end_date) {
            if date.year() == year {
                months[date.month0() as usize] += weight;
            }
        }
    }
    months
}
