// handlers/employee/breaks.rs - POST /api/breaks/start, POST /api/breaks/end

use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use super::sessions::require_active_session;
use crate::database::StoreError;
use crate::error::{ApiError, ApiResult};
use crate::middleware::CurrentEmployee;
use crate::models::Break;
use crate::state::AppState;

pub async fn start(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
) -> ApiResult<Json<Break>> {
    let session = require_active_session(&state, &me.id).await?;

    let breaks = state.repo::<Break>();
    if breaks.count(json!({ "session_id": session.id, "end_time": null })).await? > 0 {
        return Err(ApiError::conflict("Break already active"));
    }

    // a concurrent start loses on the open-break unique key
    let brk = Break::start(&session.id, state.now());
    match breaks.insert(&brk).await {
        Ok(()) => Ok(Json(brk)),
        Err(StoreError::Duplicate(_)) => Err(ApiError::conflict("Break already active")),
        Err(e) => Err(e.into()),
    }
}

pub async fn end(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
) -> ApiResult<Json<Value>> {
    let session = require_active_session(&state, &me.id).await?;

    let breaks = state.repo::<Break>();
    let open = breaks
        .select_one(json!({ "session_id": session.id, "end_time": null }))
        .await?
        .ok_or_else(|| ApiError::not_found("No active break found"))?;

    let now = state.now();
    breaks.update_by_id(&open.id, json!({ "end_time": now })).await?;

    Ok(Json(json!({
        "message": "Break ended successfully",
        "duration_seconds": (now - open.start_time).num_seconds().max(0),
    })))
}
