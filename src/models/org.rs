use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Document;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Document for Department {
    const COLLECTION: &'static str = "departments";
    const LABEL: &'static str = "Department";
}

/// An employee appointed as manager of a department
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerAssignment {
    pub id: String,
    pub employee_id: String,
    pub department_id: String,
    pub employee_name: String,
    pub employee_email: String,
    pub department_name: String,
    pub created_at: DateTime<Utc>,
}

impl Document for ManagerAssignment {
    const COLLECTION: &'static str = "managers";
    const LABEL: &'static str = "Manager";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub department_id: String,
    /// ManagerAssignment id
    pub manager_id: String,
    #[serde(default)]
    pub employee_ids: Vec<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_project_status")]
    pub status: String,
    pub created_at: DateTime<Utc>,
}

fn default_project_status() -> String {
    "active".to_string()
}

impl Document for Project {
    const COLLECTION: &'static str = "projects";
    const LABEL: &'static str = "Project";
}
