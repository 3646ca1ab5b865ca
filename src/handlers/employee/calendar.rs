// handlers/employee/calendar.rs - Month calendar, yearly dashboard and holiday list

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::FindOptions;
use crate::error::{ApiError, ApiResult};
use crate::middleware::CurrentEmployee;
use crate::models::{Holiday, LeaveRequest, WorkSession};
use crate::services::calendar::{self, MONTH_NAMES};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

fn check_year(year: i32) -> ApiResult<i32> {
    if !(1970..=9999).contains(&year) {
        return Err(ApiError::invalid_field("year", "Year must be between 1970 and 9999"));
    }
    Ok(year)
}

/// Sessions, holidays and approved leaves touching `[first, last]`
async fn load_range(
    state: &AppState,
    user_id: &str,
    first: NaiveDate,
    last: NaiveDate,
) -> ApiResult<(Vec<WorkSession>, Vec<Holiday>, Vec<LeaveRequest>)> {
    let sessions = state
        .repo::<WorkSession>()
        .select_any(json!({ "user_id": user_id, "work_date": { "$gte": first, "$lte": last } }))
        .await?;
    let holidays = state
        .repo::<Holiday>()
        .select_sorted(json!({ "date": { "$gte": first, "$lte": last } }), FindOptions::default().asc("date"))
        .await?;
    let leaves = state
        .repo::<LeaveRequest>()
        .select_any(json!({
            "employee_id": user_id,
            "status": "approved",
            "start_date": { "$lte": last },
            "end_date": { "$gte": first },
        }))
        .await?;
    Ok((sessions, holidays, leaves))
}

/// GET /api/calendar/month?year&month
pub async fn month(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<Value>> {
    let today = state.today();
    let year = check_year(query.year.unwrap_or(today.year()))?;
    let month = query.month.unwrap_or(today.month());
    if !(1..=12).contains(&month) {
        return Err(ApiError::invalid_field("month", "Month must be between 1 and 12"));
    }

    let (first, last) = calendar::month_bounds(year, month)
        .ok_or_else(|| ApiError::bad_request("Invalid year or month"))?;
    let (sessions, holidays, leaves) = load_range(&state, &me.id, first, last).await?;
    let days = calendar::build_month(year, month, &sessions, &holidays, &leaves)
        .ok_or_else(|| ApiError::bad_request("Invalid year or month"))?;

    Ok(Json(json!({ "year": year, "month": month, "days": days })))
}

/// GET /api/dashboard/stats?year
pub async fn dashboard_stats(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
    Query(query): Query<YearQuery>,
) -> ApiResult<Json<Value>> {
    let year = check_year(query.year.unwrap_or(state.today().year()))?;
    let (first, last) = calendar::year_bounds(year).ok_or_else(|| ApiError::bad_request("Invalid year"))?;
    let (sessions, _, leaves) = load_range(&state, &me.id, first, last).await?;

    let effective_seconds: i64 = sessions.iter().map(|s| s.effective_seconds).sum();
    let total_effective_hours = (effective_seconds as f64 / 3600.0 * 100.0).round() / 100.0;
    let by_month = calendar::leave_days_by_month(&leaves, year);

    let leaves_by_month: Vec<Value> = by_month
        .iter()
        .enumerate()
        .map(|(i, count)| json!({ "month": i + 1, "month_name": MONTH_NAMES[i], "leaves_count": count }))
        .collect();

    Ok(Json(json!({
        "year": year,
        "total_sessions": sessions.len(),
        "total_effective_hours": total_effective_hours,
        "half_days": sessions.iter().filter(|s| s.is_half_day).count(),
        "total_leave_days": by_month.iter().sum::<f64>(),
        "leaves_by_month": leaves_by_month,
    })))
}

/// GET /api/holidays?year
pub async fn holidays(State(state): State<AppState>, Query(query): Query<YearQuery>) -> ApiResult<Json<Vec<Holiday>>> {
    let year = check_year(query.year.unwrap_or(state.today().year()))?;
    let (first, last) = calendar::year_bounds(year).ok_or_else(|| ApiError::bad_request("Invalid year"))?;
    let holidays = state
        .repo::<Holiday>()
        .select_sorted(json!({ "date": { "$gte": first, "$lte": last } }), FindOptions::default().asc("date"))
        .await?;
    Ok(Json(holidays))
}
