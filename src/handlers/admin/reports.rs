// handlers/admin/reports.rs - Employee activity overview and dashboard figures

use std::collections::HashSet;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Datelike;
use futures::future::try_join_all;
use serde_json::{json, Value};

use crate::database::FindOptions;
use crate::error::{ApiError, ApiResult};
use crate::handlers::employee::sessions::session_history;
use crate::models::{Employee, EmployeeProfile, ItTicket, LeaveRequest, WorkSession};
use crate::services::{calendar, worktime};
use crate::services::worktime::SessionSummary;
use crate::state::AppState;

async fn employee_activity(state: &AppState, employee: Employee) -> ApiResult<Value> {
    let sessions = state.repo::<WorkSession>();
    let total_sessions = sessions.count(json!({ "user_id": employee.id })).await?;
    let total_leaves = state
        .repo::<LeaveRequest>()
        .count(json!({ "employee_id": employee.id, "status": "approved" }))
        .await?;
    let last = sessions
        .select_sorted(json!({ "user_id": employee.id }), FindOptions::default().desc("start_time").limit(1))
        .await?;

    let mut row = serde_json::to_value(EmployeeProfile::from(employee))?;
    row["total_sessions"] = json!(total_sessions);
    row["total_leaves"] = json!(total_leaves);
    row["last_login"] = json!(last.first().map(|s| s.start_time));
    Ok(row)
}

/// GET /api/admin/users - employees with session and leave totals
pub async fn users(State(state): State<AppState>) -> ApiResult<Json<Vec<Value>>> {
    let employees = state
        .repo::<Employee>()
        .select_sorted(json!({}), FindOptions::default().asc("name"))
        .await?;
    let rows = try_join_all(employees.into_iter().map(|e| employee_activity(&state, e))).await?;
    Ok(Json(rows))
}

/// GET /api/admin/user/:id/sessions
pub async fn user_sessions(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let employee = state
        .repo::<Employee>()
        .select_one(json!({ "id": id }))
        .await?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?;
    let sessions: Vec<SessionSummary> = session_history(&state, &employee.id).await?;

    Ok(Json(json!({
        "employee": EmployeeProfile::from(employee),
        "total_sessions": sessions.len(),
        "sessions": sessions,
    })))
}

/// GET /api/admin/dashboard-stats
pub async fn dashboard_stats(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let today = state.today();
    let (month_start, month_end) = calendar::month_bounds(today.year(), today.month())
        .ok_or_else(|| ApiError::internal_server_error("Invalid current month"))?;

    let employees = state.repo::<Employee>().select_any(json!({})).await?;
    let todays = state.repo::<WorkSession>().select_any(json!({ "work_date": today })).await?;
    let active_today: HashSet<&str> = todays.iter().map(|s| s.user_id.as_str()).collect();

    let leave_requests = state.repo::<LeaveRequest>();
    let leaves_this_month = leave_requests
        .count(json!({
            "status": "approved",
            "start_date": { "$lte": month_end },
            "end_date": { "$gte": month_start },
        }))
        .await?;
    let pending_leave_requests = leave_requests.count(json!({ "status": "pending" })).await?;
    let open_tickets = state
        .repo::<ItTicket>()
        .count(json!({ "status": { "$in": ["Open", "In Progress"] } }))
        .await?;

    let recent = state
        .repo::<WorkSession>()
        .select_sorted(json!({}), FindOptions::default().desc("start_time").limit(10))
        .await?;
    let offset = state.local_offset();
    let recent_sessions: Vec<Value> = recent
        .iter()
        .map(|s| {
            let user_name = employees.iter().find(|e| e.id == s.user_id).map(|e| e.name.as_str());
            json!({
                "id": s.id,
                "user_id": s.user_id,
                "user_name": user_name,
                "date": s.work_date,
                "login_time": worktime::format_clock(s.start_time, offset),
                "logout_time": s.end_time.map(|t| worktime::format_clock(t, offset)),
                "effective_duration": worktime::format_duration(s.effective_seconds),
                "is_half_day": s.is_half_day,
                "is_active": s.is_active(),
            })
        })
        .collect();

    Ok(Json(json!({
        "total_users": employees.len(),
        "active_today": active_today.len(),
        "leaves_this_month": leaves_this_month,
        "pending_leave_requests": pending_leave_requests,
        "open_tickets": open_tickets,
        "recent_sessions": recent_sessions,
    })))
}
