mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = TestApp::spawn().await?;
    let res = app.client.get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "healthy");
    Ok(())
}

#[tokio::test]
async fn register_then_fetch_profile() -> Result<()> {
    let app = TestApp::spawn().await?;
    let token = app.register("Asha Rao", "Asha@Example.com", "9000000001").await?;

    let (status, me) = app.get("/api/auth/me", &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "asha@example.com");
    assert_eq!(me["role"], "employee");
    assert!(me.get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn register_rejects_duplicates_and_bad_input() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.register("Asha", "asha@example.com", "9000000001").await?;

    let cases = [
        json!({ "name": "Other", "email": "asha@example.com", "phone": "1", "password": "secret123" }),
        json!({ "name": "Other", "email": "other@example.com", "phone": "9000000001", "password": "secret123" }),
        json!({ "name": "Other", "email": "not-an-email", "phone": "2", "password": "secret123" }),
        json!({ "name": "  ", "email": "x@example.com", "phone": "3", "password": "secret123" }),
        json!({ "name": "Other", "email": "y@example.com", "phone": "4", "password": "123" }),
    ];
    for body in cases {
        let (status, res) = app.request(Method::POST, "/api/auth/register", None, Some(body)).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", res);
    }
    Ok(())
}

#[tokio::test]
async fn login_by_email_or_phone() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.register("Asha", "asha@example.com", "9000000001").await?;

    for id in ["asha@example.com", "9000000001"] {
        let body = json!({ "email_or_phone": id, "password": "secret123" });
        let (status, res) = app.request(Method::POST, "/api/auth/login", None, Some(body)).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(res["token_type"], "bearer");
    }

    let body = json!({ "email_or_phone": "asha@example.com", "password": "wrong-password" });
    let (status, res) = app.request(Method::POST, "/api/auth/login", None, Some(body)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(res["detail"], "Invalid credentials");
    Ok(())
}

#[tokio::test]
async fn inactive_employee_cannot_login() -> Result<()> {
    let app = TestApp::spawn().await?;
    let token = app.register("Asha", "asha@example.com", "9000000001").await?;
    let id = app.employee_id(&token).await?;
    let admin = app.admin_token().await?;

    let (status, _) = app.put(&format!("/api/admin/update-employee/{}", id), &admin, json!({ "status": "inactive" })).await?;
    assert_eq!(status, StatusCode::OK);

    let body = json!({ "email_or_phone": "asha@example.com", "password": "secret123" });
    let (status, _) = app.request(Method::POST, "/api/auth/login", None, Some(body)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The token issued before deactivation stops working too
    let (status, res) = app.get("/api/auth/me", &token).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(res["detail"], "Account is inactive");
    Ok(())
}

#[tokio::test]
async fn guards_separate_roles() -> Result<()> {
    let app = TestApp::spawn().await?;
    let employee = app.register("Asha", "asha@example.com", "9000000001").await?;
    let admin = app.admin_token().await?;

    let (status, _) = app.request(Method::GET, "/api/admin/employees", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.request(Method::GET, "/api/admin/employees", Some("garbage"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/admin/employees", &employee).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/sessions/active", &admin).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, me) = app.get("/api/admin/auth/me", &admin).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], common::ADMIN_EMAIL);
    Ok(())
}

#[tokio::test]
async fn admin_bootstrap_is_closed_once_an_admin_exists() -> Result<()> {
    let app = TestApp::spawn().await?;
    let body = json!({ "name": "Mallory", "email": "mallory@example.com", "password": "secret123" });
    let (status, _) = app.request(Method::POST, "/api/admin/auth/create", None, Some(body)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}
