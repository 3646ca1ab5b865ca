// handlers/admin/holidays.rs - Holiday calendar management

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Datelike;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::database::{FindOptions, StoreError};
use crate::error::{ApiError, ApiResult};
use crate::handlers::utils;
use crate::models::{Holiday, HolidayType};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateHolidayRequest {
    pub date: String,
    pub name: String,
    #[serde(rename = "type", alias = "holiday_type")]
    pub holiday_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateHolidayRequest {
    pub date: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type", alias = "holiday_type")]
    pub holiday_type: Option<String>,
}

fn date_taken(date: chrono::NaiveDate) -> ApiError {
    ApiError::conflict(format!("A holiday already exists on {}", date))
}

/// GET /api/admin/holidays-management
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let holidays = state
        .repo::<Holiday>()
        .select_sorted(json!({}), FindOptions::default().asc("date"))
        .await?;
    let year = state.today().year();
    let this_year = holidays.iter().filter(|h| h.date.year() == year).count();

    Ok(Json(json!({
        "total_holidays": holidays.len(),
        "holidays_this_year": this_year,
        "holidays": holidays,
    })))
}

/// POST /api/admin/add-holiday
pub async fn create(State(state): State<AppState>, Json(req): Json<CreateHolidayRequest>) -> ApiResult<Json<Value>> {
    let date = utils::parse_date("date", &req.date)?;
    let name = utils::required("name", &req.name)?;
    let holiday_type: HolidayType = match req.holiday_type.as_deref() {
        Some(t) => utils::parse_choice("type", t)?,
        None => HolidayType::Mandatory,
    };

    let holidays = state.repo::<Holiday>();
    if holidays.count(json!({ "date": date })).await? > 0 {
        return Err(date_taken(date));
    }

    let holiday = Holiday::new(date, name, holiday_type, state.now());
    holidays.insert(&holiday).await?;

    tracing::info!("Added holiday {} on {}", holiday.name, holiday.date);
    Ok(Json(json!({
        "message": "Holiday added successfully",
        "holiday_id": holiday.id,
        "holiday": holiday,
    })))
}

/// PUT /api/admin/update-holiday/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateHolidayRequest>,
) -> ApiResult<Json<Holiday>> {
    let holidays = state.repo::<Holiday>();
    holidays.select_404(&id).await?;

    let mut set = Map::new();
    if let Some(raw) = &req.date {
        let date = utils::parse_date("date", raw)?;
        if holidays.count(json!({ "date": date, "id": { "$ne": id } })).await? > 0 {
            return Err(date_taken(date));
        }
        set.insert("date".into(), json!(date));
    }
    if let Some(name) = &req.name {
        set.insert("name".into(), json!(utils::required("name", name)?));
    }
    if let Some(raw) = &req.holiday_type {
        let holiday_type: HolidayType = utils::parse_choice("type", raw)?;
        set.insert("type".into(), json!(holiday_type));
    }

    let updated = holidays.update_by_id(&id, Value::Object(set)).await.map_err(|e| match e {
        StoreError::Duplicate(_) => ApiError::conflict("A holiday already exists on that date"),
        other => other.into(),
    })?;
    Ok(Json(updated))
}

/// DELETE /api/admin/holiday/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    state.repo::<Holiday>().delete_by_id(&id).await?;
    Ok(Json(json!({ "message": "Holiday deleted successfully" })))
}
