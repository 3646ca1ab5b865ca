use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Document;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    /// e.g. `leave_request`, `leave_decision`, `ticket_update`
    pub kind: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Document for Notification {
    const COLLECTION: &'static str = "notifications";
    const LABEL: &'static str = "Notification";
}
