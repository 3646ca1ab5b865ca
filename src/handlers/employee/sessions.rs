// handlers/employee/sessions.rs - Clock in/out, live progress and history

use std::collections::HashMap;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::database::{FindOptions, StoreError};
use crate::error::{ApiError, ApiResult};
use crate::handlers::utils;
use crate::middleware::CurrentEmployee;
use crate::models::{
    new_id, Break, Employee, LeaveRequest, LeaveStatus, LeaveType, Timesheet, TimesheetStatus, WorkSession,
};
use crate::services::worktime::{self, SessionSummary, WorkProgress};
use crate::state::AppState;

const ALREADY_COMPLETED: &str = "You have already completed your work session for today";

#[derive(Debug, Clone, Deserialize)]
pub struct TimesheetRequest {
    pub task_id: String,
    pub work_description: String,
    pub status: String,
}

/// Half-day accepts the timesheet either bare or under `timesheet`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum HalfDayRequest {
    Wrapped { timesheet: TimesheetRequest },
    Bare(TimesheetRequest),
}

impl HalfDayRequest {
    fn into_timesheet(self) -> TimesheetRequest {
        match self {
            HalfDayRequest::Wrapped { timesheet } => timesheet,
            HalfDayRequest::Bare(timesheet) => timesheet,
        }
    }
}

struct ValidTimesheet {
    task_id: String,
    work_description: String,
    status: TimesheetStatus,
}

fn validate_timesheet(req: &TimesheetRequest) -> ApiResult<ValidTimesheet> {
    Ok(ValidTimesheet {
        task_id: utils::required("task_id", &req.task_id)?,
        work_description: utils::required("work_description", &req.work_description)?,
        status: utils::parse_choice("status", &req.status)?,
    })
}

#[derive(Debug, Serialize)]
pub struct ActiveSessionResponse {
    pub session: WorkSession,
    pub active_break: Option<Break>,
    pub effective_seconds: i64,
    pub eta_logout_utc: Option<chrono::DateTime<chrono::Utc>>,
    pub can_logout: bool,
    pub remaining_seconds: i64,
}

pub(crate) async fn find_active_session(state: &AppState, user_id: &str) -> ApiResult<Option<WorkSession>> {
    Ok(state
        .repo::<WorkSession>()
        .select_one(json!({ "user_id": user_id, "end_time": null }))
        .await?)
}

pub(crate) async fn require_active_session(state: &AppState, user_id: &str) -> ApiResult<WorkSession> {
    find_active_session(state, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("No active session found"))
}

pub(crate) async fn session_breaks(state: &AppState, session_id: &str) -> ApiResult<Vec<Break>> {
    Ok(state
        .repo::<Break>()
        .select_sorted(json!({ "session_id": session_id }), FindOptions::default().asc("start_time"))
        .await?)
}

/// Closes open breaks, freezes the session figures and files the timesheet
async fn close_session(
    state: &AppState,
    session: &WorkSession,
    breaks: &[Break],
    timesheet: ValidTimesheet,
    half_day: bool,
) -> ApiResult<WorkSession> {
    let now = state.now();
    let effective = worktime::effective_seconds(session.start_time, breaks, now);
    let total_breaks = worktime::total_break_seconds(session.start_time, breaks, now);

    state
        .repo::<Break>()
        .update(json!({ "session_id": session.id, "end_time": null }), json!({ "end_time": now }))
        .await?;

    let updated = state
        .repo::<WorkSession>()
        .update_by_id(
            &session.id,
            json!({
                "end_time": now,
                "is_half_day": half_day || session.is_half_day,
                "effective_seconds": effective,
                "total_break_seconds": total_breaks,
            }),
        )
        .await?;

    state
        .repo::<Timesheet>()
        .insert(&Timesheet {
            id: new_id(),
            session_id: session.id.clone(),
            user_id: session.user_id.clone(),
            task_id: timesheet.task_id,
            work_description: timesheet.work_description,
            status: timesheet.status,
            submitted_at: now,
        })
        .await?;

    Ok(updated)
}

/// POST /api/sessions/start
pub async fn start(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
) -> ApiResult<Json<WorkSession>> {
    if find_active_session(&state, &me.id).await?.is_some() {
        return Err(ApiError::conflict("Active session already exists"));
    }

    let today = state.today();
    let sessions = state.repo::<WorkSession>();
    if sessions.count(json!({ "user_id": me.id, "work_date": today })).await? > 0 {
        return Err(ApiError::conflict(ALREADY_COMPLETED));
    }

    let session = WorkSession::start(&me.id, today, state.now());
    sessions.insert(&session).await.map_err(|e| match e {
        StoreError::Duplicate(_) => ApiError::conflict(ALREADY_COMPLETED),
        other => other.into(),
    })?;

    tracing::info!("Employee {} started session {} for {}", me.id, session.id, today);
    Ok(Json(session))
}

/// POST /api/sessions/end - requires the full working time unless the day is a half day
pub async fn end(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
    Json(req): Json<TimesheetRequest>,
) -> ApiResult<Json<Value>> {
    let session = require_active_session(&state, &me.id).await?;
    let timesheet = validate_timesheet(&req)?;
    let breaks = session_breaks(&state, &session.id).await?;

    let required = state.config.worktime.required_work_seconds;
    let progress = WorkProgress::compute(session.start_time, &breaks, state.now(), required);
    if !progress.can_logout && !session.is_half_day {
        return Err(ApiError::unprocessable_entity(format!(
            "Need to work {} more seconds or apply half day",
            progress.remaining_seconds
        )));
    }

    let closed = close_session(&state, &session, &breaks, timesheet, false).await?;
    tracing::info!("Employee {} ended session {}", me.id, closed.id);
    Ok(Json(json!({
        "message": "Session ended successfully",
        "effective_seconds": closed.effective_seconds,
        "total_break_seconds": closed.total_break_seconds,
    })))
}

/// GET /api/sessions/active - `null` when not clocked in
pub async fn active(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
) -> ApiResult<Json<Option<ActiveSessionResponse>>> {
    let Some(session) = find_active_session(&state, &me.id).await? else {
        return Ok(Json(None));
    };

    let breaks = session_breaks(&state, &session.id).await?;
    let progress = WorkProgress::compute(
        session.start_time,
        &breaks,
        state.now(),
        state.config.worktime.required_work_seconds,
    );
    let active_break = breaks.iter().find(|b| b.end_time.is_none()).cloned();

    Ok(Json(Some(ActiveSessionResponse {
        session,
        active_break,
        effective_seconds: progress.effective_seconds,
        eta_logout_utc: progress.eta_logout_utc,
        can_logout: progress.can_logout,
        remaining_seconds: progress.remaining_seconds,
    })))
}

/// GET /api/sessions/can-start-today
pub async fn can_start_today(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
) -> ApiResult<Json<Value>> {
    let offset = state.local_offset();

    if let Some(active) = find_active_session(&state, &me.id).await? {
        return Ok(Json(json!({
            "can_start": false,
            "has_active_session": true,
            "is_completed": false,
            "session_date": active.work_date,
            "session_time": worktime::format_clock(active.start_time, offset),
            "message": "You already have an active session",
        })));
    }

    let today = state.today();
    let todays = state
        .repo::<WorkSession>()
        .select_one(json!({ "user_id": me.id, "work_date": today }))
        .await?;

    Ok(Json(match todays {
        Some(done) => json!({
            "can_start": false,
            "has_active_session": false,
            "is_completed": true,
            "session_date": done.work_date,
            "session_time": worktime::format_clock(done.start_time, offset),
            "message": ALREADY_COMPLETED,
        }),
        None => json!({
            "can_start": true,
            "has_active_session": false,
            "is_completed": false,
            "session_date": null,
            "session_time": null,
            "message": "You can start a new session",
        }),
    }))
}

/// History rows for `user_id`, newest first
pub(crate) async fn session_history(state: &AppState, user_id: &str) -> ApiResult<Vec<SessionSummary>> {
    let sessions = state
        .repo::<WorkSession>()
        .select_sorted(json!({ "user_id": user_id }), FindOptions::default().desc("start_time"))
        .await?;
    if sessions.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
    let breaks = state.repo::<Break>().select_any(json!({ "session_id": { "$in": ids } })).await?;
    let timesheets = state.repo::<Timesheet>().select_any(json!({ "session_id": { "$in": ids } })).await?;

    let mut breaks_by_session: HashMap<&str, Vec<Break>> = HashMap::new();
    for b in &breaks {
        breaks_by_session.entry(b.session_id.as_str()).or_default().push(b.clone());
    }
    let timesheet_by_session: HashMap<&str, &Timesheet> =
        timesheets.iter().map(|t| (t.session_id.as_str(), t)).collect();

    let now = state.now();
    let offset = state.local_offset();
    Ok(sessions
        .iter()
        .map(|s| {
            let session_breaks = breaks_by_session.get(s.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            SessionSummary::build(s, session_breaks, timesheet_by_session.get(s.id.as_str()).copied(), now, offset)
        })
        .collect())
}

/// GET /api/sessions/history
pub async fn history(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
) -> ApiResult<Json<Vec<SessionSummary>>> {
    Ok(Json(session_history(&state, &me.id).await?))
}

/// POST /api/leaves/half-day - ends the active session as a half day
pub async fn half_day(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
    Json(req): Json<HalfDayRequest>,
) -> ApiResult<Json<Value>> {
    let session = require_active_session(&state, &me.id).await?;
    let timesheet = validate_timesheet(&req.into_timesheet())?;
    let breaks = session_breaks(&state, &session.id).await?;

    let closed = close_session(&state, &session, &breaks, timesheet, true).await?;
    record_half_day_leave(&state, &me, &closed).await?;

    tracing::info!("Employee {} applied half day for {}", me.id, closed.work_date);
    Ok(Json(json!({
        "message": "Half day applied and session ended successfully",
        "effective_seconds": closed.effective_seconds,
    })))
}

async fn record_half_day_leave(state: &AppState, me: &Employee, session: &WorkSession) -> ApiResult<()> {
    let now = state.now();
    let leave = LeaveRequest {
        id: new_id(),
        employee_id: me.id.clone(),
        employee_name: me.name.clone(),
        employee_email: me.email.clone(),
        leave_type: LeaveType::HalfDay,
        start_date: session.work_date,
        end_date: session.work_date,
        days_count: 0.5,
        reason: "Half day application".to_string(),
        status: LeaveStatus::Approved,
        manager_id: None,
        manager_name: None,
        manager_reason: None,
        decided_by: Some("system".to_string()),
        applied_at: now,
        decided_at: Some(now),
    };
    state.repo::<LeaveRequest>().insert(&leave).await?;
    Ok(())
}
