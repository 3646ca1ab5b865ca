#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use worktracker_api::clock::ManualClock;
use worktracker_api::config::AppConfig;
use worktracker_api::database::MemoryStore;
use worktracker_api::services::seed;
use worktracker_api::{app, AppState};

/// Monday 2025-03-10, 09:00 in the office zone (+05:30)
pub const START: &str = "2025-03-10T03:30:00Z";

pub const ADMIN_EMAIL: &str = "admin@worktracker.com";
pub const ADMIN_PASSWORD: &str = "admin123";

/// In-process server over the memory store with a hand-driven clock
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub clock: Arc<ManualClock>,
    pub state: AppState,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        let mut config = AppConfig::development();
        config.security.jwt_secret = "integration-test-secret".to_string();
        config.security.bcrypt_cost = 4;

        let start: DateTime<Utc> = START.parse()?;
        let clock = Arc::new(ManualClock::new(start));
        let state = AppState::new(Arc::new(MemoryStore::new()), Arc::new(config), clock.clone());
        seed::run(&state).await?;

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        let router = app(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
            clock,
            state,
        })
    }

    pub fn advance(&self, minutes: i64) {
        self.clock.advance(Duration::minutes(minutes));
    }

    pub async fn request(&self, method: Method, path: &str, token: Option<&str>, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let mut req = self.client.request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let res = req.send().await?;
        let status = res.status();
        let text = res.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Ok((status, body))
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, path, Some(token), None).await
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::POST, path, Some(token), Some(body)).await
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::PUT, path, Some(token), Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::DELETE, path, Some(token), None).await
    }

    /// Registers an employee and returns their bearer token
    pub async fn register(&self, name: &str, email: &str, phone: &str) -> Result<String> {
        let body = json!({ "name": name, "email": email, "phone": phone, "password": "secret123" });
        let (status, body) = self.request(Method::POST, "/api/auth/register", None, Some(body)).await?;
        anyhow::ensure!(status == StatusCode::OK, "register failed: {} {}", status, body);
        token_of(&body)
    }

    pub async fn admin_token(&self) -> Result<String> {
        let body = json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD });
        let (status, body) = self.request(Method::POST, "/api/admin/auth/login", None, Some(body)).await?;
        anyhow::ensure!(status == StatusCode::OK, "admin login failed: {} {}", status, body);
        token_of(&body)
    }

    pub async fn employee_id(&self, token: &str) -> Result<String> {
        let (_, me) = self.get("/api/auth/me", token).await?;
        me["id"].as_str().map(str::to_string).context("profile without id")
    }
}

fn token_of(body: &Value) -> Result<String> {
    body["access_token"]
        .as_str()
        .map(str::to_string)
        .context("response without access_token")
}

pub fn timesheet() -> Value {
    json!({ "task_id": "TASK-1", "work_description": "Reviewed pull requests", "status": "Completed" })
}
