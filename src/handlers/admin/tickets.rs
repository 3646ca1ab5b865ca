// handlers/admin/tickets.rs - IT ticket triage

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::database::FindOptions;
use crate::error::ApiResult;
use crate::handlers::utils;
use crate::models::{ItTicket, TicketPriority, TicketStatus};
use crate::services::notifications;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TicketListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTicketRequest {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub admin_notes: Option<String>,
}

/// GET /api/admin/it-tickets?status
pub async fn list(State(state): State<AppState>, Query(query): Query<TicketListQuery>) -> ApiResult<Json<Vec<ItTicket>>> {
    let filter = match utils::optional(query.status) {
        Some(raw) => {
            let status: TicketStatus = utils::parse_choice("status", &raw)?;
            json!({ "status": status })
        }
        None => json!({}),
    };
    let tickets = state
        .repo::<ItTicket>()
        .select_sorted(filter, FindOptions::default().desc("created_at"))
        .await?;
    Ok(Json(tickets))
}

/// PUT /api/admin/it-tickets/:id - the raising employee hears about status changes
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTicketRequest>,
) -> ApiResult<Json<ItTicket>> {
    let tickets = state.repo::<ItTicket>();
    let current = tickets.select_404(&id).await?;

    let mut set = Map::new();
    let status: Option<TicketStatus> = req.status.as_deref().map(|s| utils::parse_choice("status", s)).transpose()?;
    if let Some(status) = status {
        set.insert("status".into(), json!(status));
    }
    if let Some(raw) = req.priority.as_deref() {
        let priority: TicketPriority = utils::parse_choice("priority", raw)?;
        set.insert("priority".into(), json!(priority));
    }
    if req.admin_notes.is_some() {
        set.insert("admin_notes".into(), json!(utils::optional(req.admin_notes)));
    }
    set.insert("updated_at".into(), json!(state.now()));

    let updated = tickets.update_by_id(&id, Value::Object(set)).await?;

    if updated.status != current.status {
        let message = format!("Your ticket \"{}\" is now {}", updated.title, updated.status);
        notifications::notify(&state, &updated.employee_id, "IT ticket update", &message, "ticket_update").await;
    }
    tracing::info!("Ticket {} updated to {}", updated.id, updated.status);
    Ok(Json(updated))
}
