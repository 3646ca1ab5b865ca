use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Document;

/// Company profile shown across the app (singleton)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationSettings {
    pub id: String,
    pub company_name: String,
    #[serde(default)]
    pub establishment_date: Option<NaiveDate>,
    #[serde(default)]
    pub company_email: String,
    #[serde(default)]
    pub founder_name: String,
    #[serde(default)]
    pub founder_email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    /// Data URL of the logo; empty when unset
    #[serde(default)]
    pub company_logo: String,
    pub updated_at: DateTime<Utc>,
}

impl Document for OrganizationSettings {
    const COLLECTION: &'static str = "organization_settings";
    const LABEL: &'static str = "Organization settings";
}

impl OrganizationSettings {
    pub const SINGLETON_ID: &'static str = "default";

    pub fn defaults(now: DateTime<Utc>) -> Self {
        Self {
            id: Self::SINGLETON_ID.to_string(),
            company_name: "Work Hours Tracker".to_string(),
            establishment_date: None,
            company_email: String::new(),
            founder_name: String::new(),
            founder_email: String::new(),
            address: String::new(),
            phone: String::new(),
            website: String::new(),
            company_logo: String::new(),
            updated_at: now,
        }
    }
}
