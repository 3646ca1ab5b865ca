//! Leave balance arithmetic and the shared approve/reject step.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use serde_json::json;

use crate::error::{ApiError, ApiResult};
use crate::models::{LeaveRequest, LeaveSettings, LeaveStatus, LeaveType};
use crate::services::notifications;
use crate::state::AppState;

/// Quarter 1..=4 of a date
pub fn quarter_of(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeaveTypeBalance {
    pub allocated: f64,
    pub used: f64,
    pub pending: f64,
    pub available: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaveBalance {
    pub quarter: u32,
    pub year: i32,
    pub casual_leave: LeaveTypeBalance,
    pub sick_leave: LeaveTypeBalance,
    pub leave_without_pay: LeaveTypeBalance,
}

impl LeaveBalance {
    pub fn for_type(&self, leave_type: LeaveType) -> Option<&LeaveTypeBalance> {
        match leave_type {
            LeaveType::CasualLeave => Some(&self.casual_leave),
            LeaveType::SickLeave => Some(&self.sick_leave),
            LeaveType::LeaveWithoutPay => Some(&self.leave_without_pay),
            LeaveType::HalfDay => None,
        }
    }
}

fn type_balance(settings: &LeaveSettings, requests: &[LeaveRequest], leave_type: LeaveType, quarter: u32, year: i32) -> LeaveTypeBalance {
    let allocated = settings.quarterly(leave_type) * quarter as f64;
    let sum = |status: LeaveStatus| -> f64 {
        requests
            .iter()
            .filter(|r| r.leave_type == leave_type && r.status == status && r.start_date.year() == year)
            .map(|r| r.days_count)
            .sum()
    };
    let used = sum(LeaveStatus::Approved);
    let pending = sum(LeaveStatus::Pending);
    LeaveTypeBalance {
        allocated,
        used,
        pending,
        available: (allocated - used - pending).max(0.0),
    }
}

/// Cumulative allocation up to the current quarter minus this year's usage
pub fn compute_balance(settings: &LeaveSettings, requests: &[LeaveRequest], today: NaiveDate) -> LeaveBalance {
    let quarter = quarter_of(today);
    let year = today.year();
    LeaveBalance {
        quarter,
        year,
        casual_leave: type_balance(settings, requests, LeaveType::CasualLeave, quarter, year),
        sick_leave: type_balance(settings, requests, LeaveType::SickLeave, quarter, year),
        leave_without_pay: type_balance(settings, requests, LeaveType::LeaveWithoutPay, quarter, year),
    }
}

/// Number of calendar days in an inclusive range
pub fn calendar_span(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

pub async fn load_settings(state: &AppState) -> ApiResult<LeaveSettings> {
    let repo = state.repo::<LeaveSettings>();
    match repo.select_one(json!({ "id": LeaveSettings::SINGLETON_ID })).await? {
        Some(settings) => Ok(settings),
        None => Ok(LeaveSettings::defaults(state.now())),
    }
}

/// Records a manager or admin decision on a pending request and notifies the employee
pub async fn decide(
    state: &AppState,
    request: LeaveRequest,
    status: &str,
    reason: Option<String>,
    decided_by: &str,
) -> ApiResult<LeaveRequest> {
    let status: LeaveStatus = status.parse().map_err(|e: String| ApiError::invalid_field("status", e))?;
    if status == LeaveStatus::Pending {
        return Err(ApiError::invalid_field("status", "Status must be approved or rejected"));
    }
    if request.status != LeaveStatus::Pending {
        return Err(ApiError::bad_request(format!("Leave request has already been {}", request.status)));
    }

    let now: DateTime<Utc> = state.now();
    let reason = reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
    let repo = state.repo::<LeaveRequest>();

    // Only a still-pending request is written, so concurrent deciders cannot both win
    let changed = repo
        .update(
            json!({ "id": request.id, "status": LeaveStatus::Pending }),
            json!({
                "status": status,
                "manager_reason": reason,
                "decided_by": decided_by,
                "decided_at": now,
            }),
        )
        .await?;
    let updated = repo.select_404(&request.id).await?;
    if changed == 0 {
        return Err(ApiError::bad_request(format!("Leave request has already been {}", updated.status)));
    }

    tracing::info!(
        "Leave request {} {} by {} for employee {}",
        updated.id, status, decided_by, updated.employee_id
    );

    let mut message = format!(
        "Your {} request for {} to {} was {}",
        updated.leave_type, updated.start_date, updated.end_date, status
    );
    if let Some(reason) = &updated.manager_reason {
        message.push_str(&format!(": {}", reason));
    }
    notifications::notify(state, &updated.employee_id, "Leave request update", &message, "leave_decision").await;

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn request(leave_type: LeaveType, start: &str, days: f64, status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            id: "l".into(),
            employee_id: "u".into(),
            employee_name: "U".into(),
            employee_email: "u@x.com".into(),
            leave_type,
            start_date: d(start),
            end_date: d(start),
            days_count: days,
            reason: "r".into(),
            status,
            manager_id: None,
            manager_name: None,
            manager_reason: None,
            decided_by: None,
            applied_at: Utc::now(),
            decided_at: None,
        }
    }

    #[test]
    fn quarters() {
        assert_eq!(quarter_of(d("2025-01-15")), 1);
        assert_eq!(quarter_of(d("2025-03-31")), 1);
        assert_eq!(quarter_of(d("2025-04-01")), 2);
        assert_eq!(quarter_of(d("2025-12-31")), 4);
    }

    #[test]
    fn balance_accumulates_and_subtracts() {
        let settings = LeaveSettings::defaults(Utc::now());
        let requests = vec![
            request(LeaveType::CasualLeave, "2025-02-03", 2.0, LeaveStatus::Approved),
            request(LeaveType::CasualLeave, "2025-05-05", 1.0, LeaveStatus::Pending),
            request(LeaveType::CasualLeave, "2025-05-06", 4.0, LeaveStatus::Rejected),
            request(LeaveType::CasualLeave, "2024-11-05", 3.0, LeaveStatus::Approved),
            request(LeaveType::SickLeave, "2025-05-07", 7.0, LeaveStatus::Approved),
        ];
        let balance = compute_balance(&settings, &requests, d("2025-05-20"));
        assert_eq!(balance.quarter, 2);
        assert_eq!(
            balance.casual_leave,
            LeaveTypeBalance { allocated: 6.0, used: 2.0, pending: 1.0, available: 3.0 }
        );
        // overdrawn balances floor at zero
        assert_eq!(balance.sick_leave.available, 0.0);
        assert_eq!(balance.leave_without_pay.allocated, 10.0);
    }

    #[test]
    fn span_is_inclusive() {
        assert_eq!(calendar_span(d("2025-03-10"), d("2025-03-10")), 1);
        assert_eq!(calendar_span(d("2025-03-10"), d("2025-03-12")), 3);
    }
}
