// handlers/admin/settings.rs - Organization profile, logo and leave allocation

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::database::{Document, Repository};
use crate::error::{ApiError, ApiResult};
use crate::handlers::utils;
use crate::models::{LeaveSettings, OrganizationSettings};
use crate::services::{leave as leave_service, logo};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OrganizationSettingsRequest {
    pub company_name: String,
    pub establishment_date: Option<String>,
    pub company_email: Option<String>,
    pub founder_name: Option<String>,
    pub founder_email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogoUploadRequest {
    #[serde(default)]
    pub logo_base64: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LeaveSettingsRequest {
    pub casual_leave_quarterly: Option<f64>,
    pub sick_leave_quarterly: Option<f64>,
    pub leave_without_pay_quarterly: Option<f64>,
}

/// Applies `set` to a singleton document, creating it from `defaults` first when missing
async fn upsert_singleton<T: Document>(repo: &Repository<T>, id: &str, defaults: T, set: Value) -> ApiResult<T> {
    if repo.count(json!({ "id": id })).await? == 0 {
        repo.insert(&defaults).await?;
    }
    Ok(repo.update_by_id(id, set).await?)
}

async fn load_organization(state: &AppState) -> ApiResult<OrganizationSettings> {
    let settings = state
        .repo::<OrganizationSettings>()
        .select_one(json!({ "id": OrganizationSettings::SINGLETON_ID }))
        .await?;
    Ok(settings.unwrap_or_else(|| OrganizationSettings::defaults(state.now())))
}

fn optional_email(field: &str, raw: Option<String>) -> ApiResult<String> {
    match utils::optional(raw) {
        Some(email) => utils::normalize_email(field, &email),
        None => Ok(String::new()),
    }
}

/// Websites must be absolute http(s) URLs
fn validate_website(raw: Option<String>) -> ApiResult<String> {
    let Some(website) = utils::optional(raw) else {
        return Ok(String::new());
    };
    match url::Url::parse(&website) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some() => Ok(website),
        _ => Err(ApiError::invalid_field("website", "Website must be a valid http(s) URL")),
    }
}

/// GET /api/admin/organization-settings
pub async fn get_organization(State(state): State<AppState>) -> ApiResult<Json<OrganizationSettings>> {
    Ok(Json(load_organization(&state).await?))
}

/// PUT /api/admin/organization-settings
pub async fn update_organization(
    State(state): State<AppState>,
    Json(req): Json<OrganizationSettingsRequest>,
) -> ApiResult<Json<OrganizationSettings>> {
    let company_name = utils::required("company_name", &req.company_name)?;
    let establishment_date = utils::parse_optional_date("establishment_date", req.establishment_date.as_deref())?;
    let company_email = optional_email("company_email", req.company_email)?;
    let founder_email = optional_email("founder_email", req.founder_email)?;
    let website = validate_website(req.website)?;

    let now = state.now();
    let set = json!({
        "company_name": company_name,
        "establishment_date": establishment_date,
        "company_email": company_email,
        "founder_name": utils::optional(req.founder_name).unwrap_or_default(),
        "founder_email": founder_email,
        "address": utils::optional(req.address).unwrap_or_default(),
        "phone": utils::optional(req.phone).unwrap_or_default(),
        "website": website,
        "updated_at": now,
    });

    let repo = state.repo::<OrganizationSettings>();
    let updated = upsert_singleton(&repo, OrganizationSettings::SINGLETON_ID, OrganizationSettings::defaults(now), set).await?;
    tracing::info!("Organization settings updated ({})", updated.company_name);
    Ok(Json(updated))
}

/// POST /api/admin/upload-logo-base64
pub async fn upload_logo(State(state): State<AppState>, Json(req): Json<LogoUploadRequest>) -> ApiResult<Json<Value>> {
    let logo_url = logo::validate_logo(req.logo_base64.as_deref().unwrap_or(""), state.config.uploads.max_logo_bytes)?;

    let now = state.now();
    let repo = state.repo::<OrganizationSettings>();
    upsert_singleton(
        &repo,
        OrganizationSettings::SINGLETON_ID,
        OrganizationSettings::defaults(now),
        json!({ "company_logo": logo_url, "updated_at": now }),
    )
    .await?;

    tracing::info!("Company logo updated ({} bytes encoded)", logo_url.len());
    Ok(Json(json!({ "message": "Logo uploaded successfully", "logo_url": logo_url })))
}

/// DELETE /api/admin/remove-logo
pub async fn remove_logo(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let now = state.now();
    let repo = state.repo::<OrganizationSettings>();
    upsert_singleton(
        &repo,
        OrganizationSettings::SINGLETON_ID,
        OrganizationSettings::defaults(now),
        json!({ "company_logo": "", "updated_at": now }),
    )
    .await?;
    Ok(Json(json!({ "message": "Logo removed successfully" })))
}

/// GET /api/admin/leave-settings
pub async fn get_leave_settings(State(state): State<AppState>) -> ApiResult<Json<LeaveSettings>> {
    Ok(Json(leave_service::load_settings(&state).await?))
}

/// PUT /api/admin/leave-settings - omitted fields keep their value
pub async fn update_leave_settings(
    State(state): State<AppState>,
    Json(req): Json<LeaveSettingsRequest>,
) -> ApiResult<Json<LeaveSettings>> {
    let mut set = Map::new();
    let fields = [
        ("casual_leave_quarterly", req.casual_leave_quarterly),
        ("sick_leave_quarterly", req.sick_leave_quarterly),
        ("leave_without_pay_quarterly", req.leave_without_pay_quarterly),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            if !value.is_finite() || value < 0.0 {
                return Err(ApiError::invalid_field(name, format!("{} must be a non-negative number", name)));
            }
            set.insert(name.into(), json!(value));
        }
    }

    let now = state.now();
    set.insert("updated_at".into(), json!(now));
    let repo = state.repo::<LeaveSettings>();
    let updated = upsert_singleton(&repo, LeaveSettings::SINGLETON_ID, LeaveSettings::defaults(now), Value::Object(set)).await?;

    tracing::info!(
        "Leave settings updated: casual {}, sick {}, LWP {} per quarter",
        updated.casual_leave_quarterly, updated.sick_leave_quarterly, updated.leave_without_pay_quarterly
    );
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn website_must_be_http_url() {
        assert_eq!(validate_website(None).unwrap(), "");
        assert_eq!(validate_website(Some("https://acme.in".into())).unwrap(), "https://acme.in");
        assert!(validate_website(Some("acme".into())).is_err());
        assert!(validate_website(Some("ftp://acme.in".into())).is_err());
    }
}
