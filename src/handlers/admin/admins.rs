// handlers/admin/admins.rs - Admin account management

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::database::FindOptions;
use crate::error::{ApiError, ApiResult};
use crate::handlers::utils;
use crate::middleware::CurrentAdmin;
use crate::models::{Admin, AdminProfile};
use crate::state::AppState;

const DUPLICATE_ADMIN: &str = "Admin with this email already exists";

#[derive(Debug, Deserialize)]
pub struct CreateAdminRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAdminRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// GET /api/admin/admin-users
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<AdminProfile>>> {
    let admins = state
        .repo::<Admin>()
        .select_sorted(json!({}), FindOptions::default().asc("created_at"))
        .await?;
    Ok(Json(admins.into_iter().map(AdminProfile::from).collect()))
}

/// POST /api/admin/create-admin
pub async fn create(
    State(state): State<AppState>,
    Extension(CurrentAdmin(me)): Extension<CurrentAdmin>,
    Json(req): Json<CreateAdminRequest>,
) -> ApiResult<Json<Value>> {
    let name = utils::required("name", &req.name)?;
    let email = utils::normalize_email("email", &req.email)?;
    let password_hash = utils::hash_password(&req.password, state.config.security.bcrypt_cost)?;

    let admins = state.repo::<Admin>();
    if admins.count(json!({ "email": email })).await? > 0 {
        return Err(ApiError::bad_request(DUPLICATE_ADMIN));
    }

    let admin = Admin::new(name, email, password_hash, state.now());
    admins.insert(&admin).await.map_err(utils::duplicate_as_bad_request(DUPLICATE_ADMIN))?;

    tracing::info!("Admin {} created admin {}", me.email, admin.email);
    Ok(Json(json!({
        "message": "Admin created successfully",
        "admin_id": admin.id,
        "admin": AdminProfile::from(admin),
    })))
}

/// PUT /api/admin/update-admin/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAdminRequest>,
) -> ApiResult<Json<AdminProfile>> {
    let admins = state.repo::<Admin>();
    admins.select_404(&id).await?;

    let mut set = Map::new();
    if let Some(name) = &req.name {
        set.insert("name".into(), json!(utils::required("name", name)?));
    }
    if let Some(email) = &req.email {
        let email = utils::normalize_email("email", email)?;
        if admins.count(json!({ "email": email, "id": { "$ne": id } })).await? > 0 {
            return Err(ApiError::bad_request(DUPLICATE_ADMIN));
        }
        set.insert("email".into(), json!(email));
    }
    if let Some(password) = &req.password {
        set.insert(
            "password_hash".into(),
            json!(utils::hash_password(password, state.config.security.bcrypt_cost)?),
        );
    }

    let updated = admins
        .update_by_id(&id, Value::Object(set))
        .await
        .map_err(utils::duplicate_as_bad_request(DUPLICATE_ADMIN))?;
    Ok(Json(updated.into()))
}

/// DELETE /api/admin/delete-admin/:id - never the caller, never the last admin
pub async fn delete(
    State(state): State<AppState>,
    Extension(CurrentAdmin(me)): Extension<CurrentAdmin>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if id == me.id {
        return Err(ApiError::bad_request("You cannot delete your own admin account"));
    }

    let admins = state.repo::<Admin>();
    let target = admins.select_404(&id).await?;
    if admins.count(json!({})).await? <= 1 {
        return Err(ApiError::bad_request("Cannot delete the last admin"));
    }

    admins.delete_by_id(&id).await?;
    tracing::warn!("Admin {} deleted admin {}", me.email, target.email);
    Ok(Json(json!({ "message": "Admin deleted successfully" })))
}
