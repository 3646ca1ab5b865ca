// handlers/employee/leave.rs - Leave balance, applications and manager status

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::FindOptions;
use crate::error::{ApiError, ApiResult};
use crate::handlers::utils;
use crate::middleware::CurrentEmployee;
use crate::models::{new_id, Employee, LeaveRequest, LeaveStatus, LeaveType, ManagerAssignment};
use crate::services::leave::{self as leave_service, LeaveBalance};
use crate::services::notifications;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ApplyLeaveRequest {
    pub leave_type: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub reason: String,
    pub days_count: Option<f64>,
}

pub(crate) async fn balance_for(state: &AppState, employee_id: &str) -> ApiResult<LeaveBalance> {
    let settings = leave_service::load_settings(state).await?;
    let requests = state
        .repo::<LeaveRequest>()
        .select_any(json!({ "employee_id": employee_id, "status": { "$in": ["approved", "pending"] } }))
        .await?;
    Ok(leave_service::compute_balance(&settings, &requests, state.today()))
}

/// GET /api/employee/leave-balance
pub async fn balance(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
) -> ApiResult<Json<LeaveBalance>> {
    Ok(Json(balance_for(&state, &me.id).await?))
}

/// Manager of the employee's department, never the employee themself
async fn route_to_manager(state: &AppState, me: &Employee) -> ApiResult<Option<ManagerAssignment>> {
    let Some(department_id) = me.department_id.as_deref() else {
        return Ok(None);
    };
    let managers = state
        .repo::<ManagerAssignment>()
        .select_sorted(
            json!({ "department_id": department_id, "employee_id": { "$ne": me.id } }),
            FindOptions::default().asc("created_at").limit(1),
        )
        .await?;
    Ok(managers.into_iter().next())
}

/// POST /api/employee/apply-leave
pub async fn apply(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
    Json(req): Json<ApplyLeaveRequest>,
) -> ApiResult<Json<LeaveRequest>> {
    let leave_type: LeaveType = utils::parse_choice("leave_type", &req.leave_type)?;
    if !leave_type.is_requestable() {
        return Err(ApiError::invalid_field(
            "leave_type",
            "Half day leave is applied from an active session",
        ));
    }

    let start_date = utils::parse_date("start_date", &req.start_date)?;
    let end_date = utils::parse_date("end_date", &req.end_date)?;
    if end_date < start_date {
        return Err(ApiError::invalid_field("end_date", "End date cannot be before start date"));
    }

    let span = leave_service::calendar_span(start_date, end_date) as f64;
    let days = req.days_count.unwrap_or(span);
    if !days.is_finite() || days <= 0.0 {
        return Err(ApiError::invalid_field("days_count", "Number of days must be greater than zero"));
    }
    if days > span {
        return Err(ApiError::invalid_field(
            "days_count",
            format!("Number of days ({}) exceeds the selected date range ({} days)", days, span),
        ));
    }
    let reason = utils::required("reason", &req.reason)?;

    let balance = balance_for(&state, &me.id).await?;
    let available = balance.for_type(leave_type).map(|b| b.available).unwrap_or(0.0);
    if days > available {
        return Err(ApiError::bad_request(format!(
            "Insufficient {} balance. Available: {} days, requested: {} days",
            leave_type, available, days
        )));
    }

    let manager = route_to_manager(&state, &me).await?;
    let request = LeaveRequest {
        id: new_id(),
        employee_id: me.id.clone(),
        employee_name: me.name.clone(),
        employee_email: me.email.clone(),
        leave_type,
        start_date,
        end_date,
        days_count: days,
        reason,
        status: LeaveStatus::Pending,
        manager_id: manager.as_ref().map(|m| m.employee_id.clone()),
        manager_name: manager.as_ref().map(|m| m.employee_name.clone()),
        manager_reason: None,
        decided_by: None,
        applied_at: state.now(),
        decided_at: None,
    };
    state.repo::<LeaveRequest>().insert(&request).await?;

    if let Some(manager) = &manager {
        let message = format!(
            "{} applied for {} day(s) of {} from {} to {}",
            me.name, days, leave_type, start_date, end_date
        );
        notifications::notify(&state, &manager.employee_id, "New leave request", &message, "leave_request").await;
    }

    tracing::info!("Employee {} applied for {} ({} days)", me.id, leave_type, days);
    Ok(Json(request))
}

/// GET /api/employee/leave-requests
pub async fn my_requests(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
) -> ApiResult<Json<Vec<LeaveRequest>>> {
    let requests = state
        .repo::<LeaveRequest>()
        .select_sorted(json!({ "employee_id": me.id }), FindOptions::default().desc("applied_at"))
        .await?;
    Ok(Json(requests))
}

/// GET /api/employee/manager-status
pub async fn manager_status(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
) -> ApiResult<Json<Value>> {
    let assignments = state
        .repo::<ManagerAssignment>()
        .select_sorted(json!({ "employee_id": me.id }), FindOptions::default().asc("department_name"))
        .await?;
    let pending = state
        .repo::<LeaveRequest>()
        .count(json!({ "manager_id": me.id, "status": "pending" }))
        .await?;

    let departments: Vec<Value> = assignments
        .iter()
        .map(|a| json!({ "id": a.department_id, "name": a.department_name }))
        .collect();

    Ok(Json(json!({
        "is_manager": !assignments.is_empty(),
        "departments": departments,
        "pending_requests": pending,
    })))
}
