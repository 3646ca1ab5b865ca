// handlers/manager/leave.rs - GET/PUT /api/manager/leave-requests

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::database::FindOptions;
use crate::error::{ApiError, ApiResult};
use crate::middleware::CurrentEmployee;
use crate::models::LeaveRequest;
use crate::services::leave as leave_service;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub status: String,
    #[serde(default, alias = "reason")]
    pub manager_reason: Option<String>,
}

/// Pending requests routed to the caller
pub async fn pending(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
) -> ApiResult<Json<Vec<LeaveRequest>>> {
    let requests = state
        .repo::<LeaveRequest>()
        .select_sorted(
            json!({ "manager_id": me.id, "status": "pending" }),
            FindOptions::default().desc("applied_at"),
        )
        .await?;
    Ok(Json(requests))
}

/// Approve or reject a request routed to the caller
pub async fn decide(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
    Path(id): Path<String>,
    Json(req): Json<DecisionRequest>,
) -> ApiResult<Json<LeaveRequest>> {
    let request = state
        .repo::<LeaveRequest>()
        .select_one(json!({ "id": id, "manager_id": me.id }))
        .await?
        .ok_or_else(|| ApiError::not_found("Leave request not found"))?;

    let updated = leave_service::decide(&state, request, &req.status, req.manager_reason, &me.name).await?;
    Ok(Json(updated))
}
