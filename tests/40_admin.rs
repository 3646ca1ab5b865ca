mod common;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::json;

use common::{timesheet, TestApp};

// 1x1 PNG
const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

#[tokio::test]
async fn organization_settings_and_logo() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.admin_token().await?;

    let (status, settings) = app.get("/api/admin/organization-settings", &admin).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["company_name"], "Work Hours Tracker");

    let (status, _) = app
        .put("/api/admin/organization-settings", &admin, json!({ "company_name": " " }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app
        .put("/api/admin/organization-settings", &admin, json!({ "company_name": "Acme", "website": "not a url" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json!({
        "company_name": "Acme Labs",
        "website": "https://acme.example.com",
        "company_email": "HR@Acme.example.com",
        "establishment_date": "2010-04-01",
    });
    let (status, updated) = app.put("/api/admin/organization-settings", &admin, body).await?;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["company_email"], "hr@acme.example.com");
    assert_eq!(updated["establishment_date"], "2010-04-01");

    let bad_logos = [
        json!({}),
        json!({ "logo_base64": "https://acme.example.com/logo.png" }),
        json!({ "logo_base64": "data:image/png;base64,%%%" }),
        json!({ "logo_base64": PNG_DATA_URL.replace("image/png", "image/gif") }),
    ];
    for body in bad_logos {
        let (status, _) = app.post("/api/admin/upload-logo-base64", &admin, body).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, res) = app
        .post("/api/admin/upload-logo-base64", &admin, json!({ "logo_base64": PNG_DATA_URL }))
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", res);
    assert_eq!(res["logo_url"], PNG_DATA_URL);
    let (_, settings) = app.get("/api/admin/organization-settings", &admin).await?;
    assert_eq!(settings["company_logo"], PNG_DATA_URL);
    assert_eq!(settings["company_name"], "Acme Labs");

    let (status, _) = app.delete("/api/admin/remove-logo", &admin).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, settings) = app.get("/api/admin/organization-settings", &admin).await?;
    assert_eq!(settings["company_logo"], "");
    Ok(())
}

#[tokio::test]
async fn leave_settings_drive_balances() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.admin_token().await?;
    let token = app.register("Asha", "asha@example.com", "9000000001").await?;

    let (status, _) = app.put("/api/admin/leave-settings", &admin, json!({ "sick_leave_quarterly": -1 })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, settings) = app.put("/api/admin/leave-settings", &admin, json!({ "casual_leave_quarterly": 4.5 })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["casual_leave_quarterly"], 4.5);
    assert_eq!(settings["sick_leave_quarterly"], 3.0);

    let (_, balance) = app.get("/api/employee/leave-balance", &token).await?;
    assert_eq!(balance["casual_leave"]["allocated"], 4.5);
    Ok(())
}

#[tokio::test]
async fn ticket_status_change_notifies_employee() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.admin_token().await?;
    let token = app.register("Asha", "asha@example.com", "9000000001").await?;

    let (status, _) = app
        .post("/api/employee/it-tickets", &token, json!({ "title": "VPN", "category": "Plumbing" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app
        .post("/api/employee/it-tickets", &token, json!({ "title": "", "category": "Network/Connectivity" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json!({ "title": "VPN drops", "description": "Every hour", "category": "Network/Connectivity" });
    let (status, ticket) = app.post("/api/employee/it-tickets", &token, body).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ticket["priority"], "Medium");
    assert_eq!(ticket["status"], "Open");

    let (_, open) = app.get("/api/admin/it-tickets?status=Open", &admin).await?;
    assert_eq!(open.as_array().map(Vec::len), Some(1));

    let path = format!("/api/admin/it-tickets/{}", ticket["id"].as_str().context("ticket id")?);
    let (status, _) = app.put(&path, &admin, json!({ "status": "Fixed" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, updated) = app
        .put(&path, &admin, json!({ "status": "In Progress", "admin_notes": "Replacing router" }))
        .await?;
    assert_eq!(updated["status"], "In Progress");
    assert_eq!(updated["admin_notes"], "Replacing router");

    let (_, notes) = app.get("/api/employee/notifications", &token).await?;
    assert_eq!(notes[0]["kind"], "ticket_update");

    // Notes alone do not notify
    app.put(&path, &admin, json!({ "admin_notes": "Router ordered" })).await?;
    let (_, notes) = app.get("/api/employee/notifications", &token).await?;
    assert_eq!(notes.as_array().map(Vec::len), Some(1));

    let (_, mine) = app.get("/api/employee/it-tickets", &token).await?;
    assert_eq!(mine[0]["admin_notes"], "Router ordered");
    Ok(())
}

#[tokio::test]
async fn holidays_are_unique_per_date() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.admin_token().await?;

    let (_, listing) = app.get("/api/admin/holidays-management", &admin).await?;
    assert_eq!(listing["total_holidays"], 6);
    assert_eq!(listing["holidays_this_year"], 6);

    let (status, res) = app
        .post("/api/admin/add-holiday", &admin, json!({ "date": "2025-03-14", "name": "Holi" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res["holiday"]["type"], "Mandatory");
    let holiday_id = res["holiday_id"].as_str().context("holiday id")?.to_string();

    let (status, _) = app
        .post("/api/admin/add-holiday", &admin, json!({ "date": "2025-03-14", "name": "Again" }))
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = app
        .put(&format!("/api/admin/update-holiday/{}", holiday_id), &admin, json!({ "date": "2025-01-26" }))
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, updated) = app
        .put(&format!("/api/admin/update-holiday/{}", holiday_id), &admin, json!({ "type": "Optional" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["type"], "Optional");

    let (status, _) = app.delete(&format!("/api/admin/holiday/{}", holiday_id), &admin).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.delete(&format!("/api/admin/holiday/{}", holiday_id), &admin).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn admin_accounts_keep_at_least_one() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.admin_token().await?;
    let (_, me) = app.get("/api/admin/auth/me", &admin).await?;
    let my_id = me["id"].as_str().context("admin id")?.to_string();

    let (status, _) = app.delete(&format!("/api/admin/delete-admin/{}", my_id), &admin).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json!({ "name": "Second", "email": "second@worktracker.com", "password": "secret123" });
    let (status, created) = app.post("/api/admin/create-admin", &admin, body.clone()).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.post("/api/admin/create-admin", &admin, body).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let second_id = created["admin_id"].as_str().context("admin id")?.to_string();
    let (status, renamed) = app
        .put(&format!("/api/admin/update-admin/{}", second_id), &admin, json!({ "name": "Deputy" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "Deputy");

    let (_, admins) = app.get("/api/admin/admin-users", &admin).await?;
    assert_eq!(admins.as_array().map(Vec::len), Some(2));

    let (status, _) = app.delete(&format!("/api/admin/delete-admin/{}", second_id), &admin).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn reports_and_cascading_employee_delete() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.admin_token().await?;

    let body = json!({
        "name": "Asha",
        "email": "asha@example.com",
        "phone": "9000000001",
        "password": "secret123",
        "designation": "Engineer",
    });
    let (status, created) = app.post("/api/admin/create-employee", &admin, body).await?;
    assert_eq!(status, StatusCode::OK, "{}", created);
    assert_eq!(created["employee"]["designation"], "Engineer");
    let id = created["employee_id"].as_str().context("employee id")?.to_string();

    let login = json!({ "email_or_phone": "asha@example.com", "password": "secret123" });
    let (_, tokens) = app.request(reqwest::Method::POST, "/api/auth/login", None, Some(login)).await?;
    let token = tokens["access_token"].as_str().context("token")?.to_string();

    app.post("/api/sessions/start", &token, json!({})).await?;
    app.post("/api/employee/it-tickets", &token, json!({ "title": "Laptop", "category": "Hardware Issues" })).await?;

    let (_, stats) = app.get("/api/admin/dashboard-stats", &admin).await?;
    assert_eq!(stats["total_users"], 1);
    assert_eq!(stats["active_today"], 1);
    assert_eq!(stats["open_tickets"], 1);
    assert_eq!(stats["recent_sessions"][0]["user_name"], "Asha");

    app.advance(9 * 60);
    app.post("/api/sessions/end", &token, timesheet()).await?;

    let (_, users) = app.get("/api/admin/users", &admin).await?;
    assert_eq!(users[0]["total_sessions"], 1);
    assert_eq!(users[0]["last_login"], common::START);

    let (status, sessions) = app.get(&format!("/api/admin/user/{}/sessions", id), &admin).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sessions["total_sessions"], 1);
    let (status, _) = app.get("/api/admin/user/nobody/sessions", &admin).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, res) = app.delete(&format!("/api/admin/delete-employee/{}", id), &admin).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res["deleted"]["sessions"], 1);
    assert_eq!(res["deleted"]["timesheets"], 1);
    assert_eq!(res["deleted"]["it_tickets"], 1);

    // The token now names a missing subject
    let (status, _) = app.get("/api/auth/me", &token).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (_, employees) = app.get("/api/admin/employees", &admin).await?;
    assert_eq!(employees.as_array().map(Vec::len), Some(0));
    Ok(())
}
