// handlers/admin/leave.rs - Organization-wide leave requests

use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::FindOptions;
use crate::error::ApiResult;
use crate::handlers::utils;
use crate::middleware::CurrentAdmin;
use crate::models::{LeaveRequest, LeaveStatus};
use crate::services::leave as leave_service;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LeaveListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminDecisionRequest {
    pub status: String,
    #[serde(default, alias = "manager_reason", alias = "admin_reason")]
    pub reason: Option<String>,
}

/// GET /api/admin/leave-requests?status
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<LeaveListQuery>,
) -> ApiResult<Json<Vec<LeaveRequest>>> {
    let filter = match query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => {
            let status: LeaveStatus = utils::parse_choice("status", raw)?;
            json!({ "status": status })
        }
        None => json!({}),
    };
    let requests = state
        .repo::<LeaveRequest>()
        .select_sorted(filter, FindOptions::default().desc("applied_at"))
        .await?;
    Ok(Json(requests))
}

/// PUT /api/admin/leave-requests/:id - admin decision on any pending request
pub async fn decide(
    State(state): State<AppState>,
    Extension(CurrentAdmin(me)): Extension<CurrentAdmin>,
    Path(id): Path<String>,
    Json(req): Json<AdminDecisionRequest>,
) -> ApiResult<Json<LeaveRequest>> {
    let request = state.repo::<LeaveRequest>().select_404(&id).await?;
    let decided_by = format!("{} (admin)", me.name);
    let updated = leave_service::decide(&state, request, &req.status, req.reason, &decided_by).await?;
    Ok(Json(updated))
}

/// GET /api/admin/users-on-leave - approved leave covering today
pub async fn users_on_leave(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let today = state.today();
    let leaves = state
        .repo::<LeaveRequest>()
        .select_sorted(
            json!({ "status": "approved", "start_date": { "$lte": today }, "end_date": { "$gte": today } }),
            FindOptions::default().asc("employee_name"),
        )
        .await?;

    let distinct: HashSet<&str> = leaves.iter().map(|l| l.employee_id.as_str()).collect();
    let users: Vec<Value> = leaves
        .iter()
        .map(|l| {
            json!({
                "employee_id": l.employee_id,
                "employee_name": l.employee_name,
                "employee_email": l.employee_email,
                "leave_type": l.leave_type,
                "start_date": l.start_date,
                "end_date": l.end_date,
                "days_count": l.days_count,
            })
        })
        .collect();

    Ok(Json(json!({ "users_on_leave_today": distinct.len(), "date": today, "users": users })))
}
