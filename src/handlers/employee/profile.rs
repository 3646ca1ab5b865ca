// handlers/employee/profile.rs - GET /api/auth/me

use axum::{Extension, Json};

use crate::error::ApiResult;
use crate::middleware::CurrentEmployee;
use crate::models::EmployeeProfile;

pub async fn me(Extension(CurrentEmployee(me)): Extension<CurrentEmployee>) -> ApiResult<Json<EmployeeProfile>> {
    Ok(Json(me.into()))
}
