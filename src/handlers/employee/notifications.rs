// handlers/employee/notifications.rs

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::database::FindOptions;
use crate::error::{ApiError, ApiResult};
use crate::middleware::CurrentEmployee;
use crate::models::Notification;
use crate::state::AppState;

/// GET /api/employee/notifications - newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
) -> ApiResult<Json<Vec<Notification>>> {
    let notifications = state
        .repo::<Notification>()
        .select_sorted(json!({ "user_id": me.id }), FindOptions::default().desc("created_at"))
        .await?;
    Ok(Json(notifications))
}

/// PUT /api/employee/notifications/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let changed = state
        .repo::<Notification>()
        .update(json!({ "id": id, "user_id": me.id }), json!({ "read": true }))
        .await?;
    if changed == 0 {
        return Err(ApiError::not_found("Notification not found"));
    }
    Ok(Json(json!({ "message": "Notification marked as read" })))
}
