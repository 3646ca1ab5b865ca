// handlers/admin/auth.rs - GET /api/admin/auth/me

use axum::{Extension, Json};

use crate::error::ApiResult;
use crate::middleware::CurrentAdmin;
use crate::models::AdminProfile;

pub async fn me(Extension(CurrentAdmin(me)): Extension<CurrentAdmin>) -> ApiResult<Json<AdminProfile>> {
    Ok(Json(me.into()))
}
