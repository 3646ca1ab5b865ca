mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{timesheet, TestApp};

#[tokio::test]
async fn full_day_with_a_break() -> Result<()> {
    let app = TestApp::spawn().await?;
    let token = app.register("Asha", "asha@example.com", "9000000001").await?;

    let (status, session) = app.post("/api/sessions/start", &token, json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["work_date"], "2025-03-10");

    let (status, res) = app.post("/api/sessions/start", &token, json!({})).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(res["detail"], "Active session already exists");

    app.advance(60);
    let (status, _) = app.post("/api/breaks/start", &token, json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, res) = app.post("/api/breaks/start", &token, json!({})).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(res["detail"], "Break already active");

    // Open breaks count up to now
    app.advance(30);
    let (_, active) = app.get("/api/sessions/active", &token).await?;
    assert_eq!(active["effective_seconds"], 3600);
    assert!(active["active_break"].is_object());

    let (status, _) = app.post("/api/breaks/end", &token, json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.post("/api/breaks/end", &token, json!({})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 1h30m elapsed, 1h worked: 8h short of the requirement
    let (status, res) = app.post("/api/sessions/end", &token, timesheet()).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res["detail"], "Need to work 28800 more seconds or apply half day");

    let (_, active) = app.get("/api/sessions/active", &token).await?;
    assert_eq!(active["remaining_seconds"], 28800);
    assert_eq!(active["can_logout"], false);
    assert!(active["eta_logout_utc"].is_string());

    app.advance(8 * 60);
    let (status, res) = app.post("/api/sessions/end", &token, timesheet()).await?;
    assert_eq!(status, StatusCode::OK, "{}", res);
    assert_eq!(res["effective_seconds"], 32400);
    assert_eq!(res["total_break_seconds"], 1800);

    let (_, active) = app.get("/api/sessions/active", &token).await?;
    assert!(active.is_null());

    let (_, history) = app.get("/api/sessions/history", &token).await?;
    let row = &history[0];
    assert_eq!(row["date"], "2025-03-10");
    assert_eq!(row["login_time"], "09:00 AM");
    assert_eq!(row["logout_time"], "06:30 PM");
    assert_eq!(row["effective_duration"], "9h 00m");
    assert_eq!(row["break_count"], 1);
    assert_eq!(row["day_type"], "Full Day");
    assert_eq!(row["timesheet_status"], "Submitted");
    assert_eq!(row["task_id"], "TASK-1");
    Ok(())
}

#[tokio::test]
async fn one_session_per_local_day() -> Result<()> {
    let app = TestApp::spawn().await?;
    let token = app.register("Asha", "asha@example.com", "9000000001").await?;

    let (_, check) = app.get("/api/sessions/can-start-today", &token).await?;
    assert_eq!(check["can_start"], true);

    app.post("/api/sessions/start", &token, json!({})).await?;
    let (_, check) = app.get("/api/sessions/can-start-today", &token).await?;
    assert_eq!(check["has_active_session"], true);
    assert_eq!(check["session_time"], "09:00 AM");

    app.advance(9 * 60);
    let (status, _) = app.post("/api/sessions/end", &token, timesheet()).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.post("/api/sessions/start", &token, json!({})).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    let (_, check) = app.get("/api/sessions/can-start-today", &token).await?;
    assert_eq!(check["can_start"], false);
    assert_eq!(check["is_completed"], true);

    // 18:00 → next local morning
    app.advance(15 * 60);
    let (status, session) = app.post("/api/sessions/start", &token, json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["work_date"], "2025-03-11");
    Ok(())
}

#[tokio::test]
async fn timesheet_is_validated() -> Result<()> {
    let app = TestApp::spawn().await?;
    let token = app.register("Asha", "asha@example.com", "9000000001").await?;

    let (status, _) = app.post("/api/sessions/end", &token, timesheet()).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.post("/api/sessions/start", &token, json!({})).await?;
    app.advance(9 * 60);
    let bad: [Value; 3] = [
        json!({ "task_id": "", "work_description": "x", "status": "Completed" }),
        json!({ "task_id": "T", "work_description": " ", "status": "Completed" }),
        json!({ "task_id": "T", "work_description": "x", "status": "Done" }),
    ];
    for body in bad {
        let (status, _) = app.post("/api/sessions/end", &token, body).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    Ok(())
}

#[tokio::test]
async fn half_day_ends_session_and_records_leave() -> Result<()> {
    let app = TestApp::spawn().await?;
    let token = app.register("Asha", "asha@example.com", "9000000001").await?;

    let (status, _) = app.post("/api/leaves/half-day", &token, json!({ "timesheet": timesheet() })).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.post("/api/sessions/start", &token, json!({})).await?;
    app.advance(4 * 60);
    let (status, res) = app.post("/api/leaves/half-day", &token, json!({ "timesheet": timesheet() })).await?;
    assert_eq!(status, StatusCode::OK, "{}", res);
    assert_eq!(res["effective_seconds"], 4 * 3600);

    let (_, history) = app.get("/api/sessions/history", &token).await?;
    assert_eq!(history[0]["day_type"], "Half Day");

    let (_, leaves) = app.get("/api/employee/leave-requests", &token).await?;
    assert_eq!(leaves[0]["leave_type"], "Half Day");
    assert_eq!(leaves[0]["status"], "approved");
    assert_eq!(leaves[0]["days_count"], 0.5);

    let (_, month) = app.get("/api/calendar/month?year=2025&month=3", &token).await?;
    assert_eq!(month["days"][9]["type"], "half-day");

    let (_, stats) = app.get("/api/dashboard/stats?year=2025", &token).await?;
    assert_eq!(stats["half_days"], 1);
    assert_eq!(stats["total_leave_days"], 0.5);
    assert_eq!(stats["leaves_by_month"][2]["leaves_count"], 0.5);
    Ok(())
}

#[tokio::test]
async fn calendar_marks_worked_days_holidays_and_weekends() -> Result<()> {
    let app = TestApp::spawn().await?;
    let token = app.register("Asha", "asha@example.com", "9000000001").await?;
    app.post("/api/sessions/start", &token, json!({})).await?;

    let (status, month) = app.get("/api/calendar/month?year=2025&month=3", &token).await?;
    assert_eq!(status, StatusCode::OK);
    let days = month["days"].as_array().map(Vec::len);
    assert_eq!(days, Some(31));
    assert_eq!(month["days"][9]["type"], "worked");
    assert_eq!(month["days"][8]["type"], "weekend");
    assert_eq!(month["days"][10]["type"], "working-day");

    let (_, january) = app.get("/api/calendar/month?year=2025&month=1", &token).await?;
    assert_eq!(january["days"][25]["type"], "holiday");
    assert_eq!(january["days"][25]["name"], "Republic Day");

    let (status, _) = app.get("/api/calendar/month?year=2025&month=13", &token).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.get("/api/calendar/month?year=1969&month=1", &token).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, holidays) = app.get("/api/holidays?year=2025", &token).await?;
    assert_eq!(holidays[0]["date"], "2025-01-01");
    Ok(())
}

#[tokio::test]
async fn simultaneous_break_starts_open_one_break() -> Result<()> {
    let app = TestApp::spawn().await?;
    let token = app.register("Asha", "asha@example.com", "9000000001").await?;
    app.post("/api/sessions/start", &token, json!({})).await?;
    app.advance(60);

    let (a, b, c) = tokio::join!(
        app.post("/api/breaks/start", &token, json!({})),
        app.post("/api/breaks/start", &token, json!({})),
        app.post("/api/breaks/start", &token, json!({})),
    );
    let statuses = [a?.0, b?.0, c?.0];
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(), 2);

    app.advance(30);
    app.post("/api/breaks/end", &token, json!({})).await?;
    let (_, active) = app.get("/api/sessions/active", &token).await?;
    // one 30 minute break out of 90 minutes
    assert_eq!(active["effective_seconds"], 3600);
    Ok(())
}
