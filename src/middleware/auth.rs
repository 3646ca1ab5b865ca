use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{self, Claims, Role};
use crate::error::ApiError;
use crate::models::{Admin, Employee, EmployeeStatus};
use crate::state::AppState;

/// Authenticated employee, inserted by `employee_auth_middleware`
#[derive(Clone, Debug)]
pub struct CurrentEmployee(pub Employee);

/// Authenticated admin, inserted by `admin_auth_middleware`
#[derive(Clone, Debug)]
pub struct CurrentAdmin(pub Admin);

/// Requires a valid employee bearer token and loads the employee
pub async fn employee_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state, &headers)?;
    if claims.role != Role::Employee {
        return Err(ApiError::forbidden("Employee access required"));
    }

    let employee = state
        .repo::<Employee>()
        .select_one(serde_json::json!({ "id": claims.sub }))
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;
    // Deactivation takes effect on tokens already issued
    if employee.status == EmployeeStatus::Inactive {
        return Err(ApiError::forbidden("Account is inactive"));
    }

    request.extensions_mut().insert(CurrentEmployee(employee));
    Ok(next.run(request).await)
}

/// Requires a valid admin bearer token and loads the admin
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state, &headers)?;
    if claims.role != Role::Admin {
        tracing::warn!("Non-admin subject {} attempted an admin route", claims.sub);
        return Err(ApiError::forbidden("Admin access required"));
    }

    let admin = state
        .repo::<Admin>()
        .select_one(serde_json::json!({ "id": claims.sub }))
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    request.extensions_mut().insert(CurrentAdmin(admin));
    Ok(next.run(request).await)
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Claims, ApiError> {
    let token = extract_bearer_token(headers).map_err(ApiError::unauthorized)?;
    Ok(auth::validate_jwt(&token, &state.config.security)?)
}

/// Extract JWT token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Not authenticated".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("bearer "))
        .ok_or_else(|| "Authorization header must use Bearer token format".to_string())?;

    if token.trim().is_empty() {
        return Err("Empty bearer token".to_string());
    }
    Ok(token.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert("authorization", HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc")).unwrap(), "abc");
        assert_eq!(extract_bearer_token(&headers("bearer abc ")).unwrap(), "abc");
        assert!(extract_bearer_token(&headers("Basic abc")).is_err());
        assert!(extract_bearer_token(&headers("Bearer   ")).is_err());
        assert!(extract_bearer_token(&HeaderMap::new()).is_err());
    }
}
