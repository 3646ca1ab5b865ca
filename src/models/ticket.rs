use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Document;

crate::string_enum!(TicketCategory, "category" {
    Hardware => "Hardware Issues",
    Software => "Software Issues",
    Network => "Network/Connectivity",
    Access => "Account/Access",
    Security => "Security",
    General => "General Support",
});

crate::string_enum!(TicketPriority, "priority" {
    Low => "Low",
    Medium => "Medium",
    High => "High",
    Critical => "Critical",
});

crate::string_enum!(TicketStatus, "status" {
    Open => "Open",
    InProgress => "In Progress",
    Resolved => "Resolved",
    Closed => "Closed",
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItTicket {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    #[serde(default)]
    pub employee_email: String,
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    #[serde(default)]
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for ItTicket {
    const COLLECTION: &'static str = "it_tickets";
    const LABEL: &'static str = "Ticket";
}
