// handlers/public/auth.rs - Registration and login for employees and admins

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, Role};
use crate::error::{ApiError, ApiResult};
use crate::handlers::utils::{self, TokenResponse};
use crate::models::{Admin, AdminProfile, Employee, EmployeeStatus};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email_or_phone: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AdminCreateRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// POST /api/auth/register - self-service employee sign-up
pub async fn register(State(state): State<AppState>, Json(req): Json<RegisterRequest>) -> ApiResult<Json<TokenResponse>> {
    let name = utils::required("name", &req.name)?;
    let email = utils::normalize_email("email", &req.email)?;
    let phone = utils::required("phone", &req.phone)?;
    let password_hash = utils::hash_password(&req.password, state.config.security.bcrypt_cost)?;

    let employees = state.repo::<Employee>();
    let existing = employees
        .count(json!({ "$or": [{ "email": email }, { "phone": phone }] }))
        .await?;
    if existing > 0 {
        return Err(ApiError::bad_request("User already exists"));
    }

    let employee = Employee::new(name, email, phone, password_hash, state.now());
    employees
        .insert(&employee)
        .await
        .map_err(utils::duplicate_as_bad_request("User already exists"))?;

    tracing::info!("Registered employee {} ({})", employee.id, employee.email);
    let token = auth::issue_token(&employee.id, Role::Employee, &state.config.security)?;
    Ok(Json(TokenResponse::bearer(token)))
}

/// POST /api/auth/login - email or phone plus password
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> ApiResult<Json<TokenResponse>> {
    let identifier = req.email_or_phone.trim();
    let employee = state
        .repo::<Employee>()
        .select_one(json!({ "$or": [{ "email": identifier.to_lowercase() }, { "phone": identifier }] }))
        .await?;

    let employee = match employee {
        Some(e) if auth::verify_password(&req.password, &e.password_hash) => e,
        _ => {
            tracing::warn!("Failed employee login for {}", identifier);
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
    };
    if employee.status == EmployeeStatus::Inactive {
        return Err(ApiError::forbidden("Account is inactive"));
    }

    let token = auth::issue_token(&employee.id, Role::Employee, &state.config.security)?;
    Ok(Json(TokenResponse::bearer(token)))
}

/// POST /api/admin/auth/login
pub async fn admin_login(State(state): State<AppState>, Json(req): Json<AdminLoginRequest>) -> ApiResult<Json<TokenResponse>> {
    let email = req.email.trim().to_lowercase();
    let admin = state.repo::<Admin>().select_one(json!({ "email": email })).await?;

    let admin = match admin {
        Some(a) if auth::verify_password(&req.password, &a.password_hash) => a,
        _ => {
            tracing::warn!("Failed admin login for {}", email);
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
    };

    tracing::info!("Admin {} logged in", admin.email);
    let token = auth::issue_token(&admin.id, Role::Admin, &state.config.security)?;
    Ok(Json(TokenResponse::bearer(token)))
}

/// POST /api/admin/auth/create - first-admin bootstrap, refused once any admin exists
pub async fn admin_create(State(state): State<AppState>, Json(req): Json<AdminCreateRequest>) -> ApiResult<Json<Value>> {
    let admins = state.repo::<Admin>();
    if admins.count(json!({})).await? > 0 {
        tracing::warn!("Rejected admin bootstrap for {}: an admin already exists", req.email);
        return Err(ApiError::forbidden("An admin already exists; sign in as an admin to create more"));
    }

    let name = utils::required("name", &req.name)?;
    let email = utils::normalize_email("email", &req.email)?;
    let password_hash = utils::hash_password(&req.password, state.config.security.bcrypt_cost)?;

    let admin = Admin::new(name, email, password_hash, state.now());
    admins
        .insert(&admin)
        .await
        .map_err(utils::duplicate_as_bad_request("Admin with this email already exists"))?;

    tracing::info!("Bootstrapped admin {}", admin.email);
    let token = auth::issue_token(&admin.id, Role::Admin, &state.config.security)?;
    Ok(Json(json!({
        "access_token": token,
        "token_type": "bearer",
        "admin": AdminProfile::from(admin),
    })))
}
