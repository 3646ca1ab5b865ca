use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Document;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Document for Admin {
    const COLLECTION: &'static str = "admins";
    const LABEL: &'static str = "Admin";
}

impl Admin {
    pub fn new(name: String, email: String, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: super::new_id(),
            name,
            email,
            password_hash,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: &'static str,
    pub created_at: DateTime<Utc>,
}

impl From<Admin> for AdminProfile {
    fn from(a: Admin) -> Self {
        Self {
            id: a.id,
            name: a.name,
            email: a.email,
            role: "admin",
            created_at: a.created_at,
        }
    }
}
