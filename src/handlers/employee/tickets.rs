// handlers/employee/tickets.rs - IT support tickets raised by the caller

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::json;

use crate::database::FindOptions;
use crate::error::ApiResult;
use crate::handlers::utils;
use crate::middleware::CurrentEmployee;
use crate::models::{new_id, ItTicket, TicketCategory, TicketPriority, TicketStatus};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub priority: Option<String>,
}

/// POST /api/employee/it-tickets
pub async fn create(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
    Json(req): Json<CreateTicketRequest>,
) -> ApiResult<Json<ItTicket>> {
    let title = utils::required("title", &req.title)?;
    let category: TicketCategory = utils::parse_choice("category", &req.category)?;
    let priority: TicketPriority = match req.priority.as_deref() {
        Some(p) => utils::parse_choice("priority", p)?,
        None => TicketPriority::Medium,
    };

    let now = state.now();
    let ticket = ItTicket {
        id: new_id(),
        employee_id: me.id.clone(),
        employee_name: me.name.clone(),
        employee_email: me.email.clone(),
        title,
        description: req.description.trim().to_string(),
        category,
        priority,
        status: TicketStatus::Open,
        admin_notes: None,
        created_at: now,
        updated_at: now,
    };
    state.repo::<ItTicket>().insert(&ticket).await?;

    tracing::info!("Employee {} opened ticket {} ({})", me.id, ticket.id, category);
    Ok(Json(ticket))
}

/// GET /api/employee/it-tickets
pub async fn list(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
) -> ApiResult<Json<Vec<ItTicket>>> {
    let tickets = state
        .repo::<ItTicket>()
        .select_sorted(json!({ "employee_id": me.id }), FindOptions::default().desc("created_at"))
        .await?;
    Ok(Json(tickets))
}
