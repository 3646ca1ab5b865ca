use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Document;

crate::string_enum!(HolidayType, "holiday type" {
    Mandatory => "Mandatory",
    Optional => "Optional",
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holiday {
    pub id: String,
    pub date: NaiveDate,
    pub name: String,
    #[serde(rename = "type")]
    pub holiday_type: HolidayType,
    pub created_at: DateTime<Utc>,
}

impl Document for Holiday {
    const COLLECTION: &'static str = "holidays";
    const LABEL: &'static str = "Holiday";
}

impl Holiday {
    pub fn new(date: NaiveDate, name: impl Into<String>, holiday_type: HolidayType, now: DateTime<Utc>) -> Self {
        Self {
            id: super::new_id(),
            date,
            name: name.into(),
            holiday_type,
            created_at: now,
        }
    }
}
