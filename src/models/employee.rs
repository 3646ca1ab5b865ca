use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Document;

crate::string_enum!(EmployeeStatus, "status" {
    Active => "active",
    Inactive => "inactive",
});

impl Default for EmployeeStatus {
    fn default() -> Self {
        EmployeeStatus::Active
    }
}

/// Stored employee account (`users` collection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub status: EmployeeStatus,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub aadhar_card: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    /// Department display name
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub department_id: Option<String>,
    #[serde(default)]
    pub joining_date: Option<NaiveDate>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

fn default_role() -> String {
    "employee".to_string()
}

impl Document for Employee {
    const COLLECTION: &'static str = "users";
    const LABEL: &'static str = "Employee";
}

impl Employee {
    pub fn new(name: String, email: String, phone: String, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: super::new_id(),
            name,
            email,
            phone,
            password_hash,
            role: default_role(),
            status: EmployeeStatus::Active,
            dob: None,
            blood_group: None,
            emergency_contact: None,
            address: None,
            aadhar_card: None,
            designation: None,
            department: None,
            department_id: None,
            joining_date: None,
            release_date: None,
            created_at: now,
        }
    }
}

/// Employee as returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub status: EmployeeStatus,
    pub dob: Option<NaiveDate>,
    pub blood_group: Option<String>,
    pub emergency_contact: Option<String>,
    pub address: Option<String>,
    pub aadhar_card: Option<String>,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub department_id: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub release_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<Employee> for EmployeeProfile {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            name: e.name,
            email: e.email,
            phone: e.phone,
            role: e.role,
            status: e.status,
            dob: e.dob,
            blood_group: e.blood_group,
            emergency_contact: e.emergency_contact,
            address: e.address,
            aadhar_card: e.aadhar_card,
            designation: e.designation,
            department: e.department,
            department_id: e.department_id,
            joining_date: e.joining_date,
            release_date: e.release_date,
            created_at: e.created_at,
        }
    }
}
