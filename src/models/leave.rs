use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Document;

crate::string_enum!(LeaveType, "leave type" {
    CasualLeave => "Casual Leave",
    SickLeave => "Sick Leave",
    LeaveWithoutPay => "Leave Without Pay",
    HalfDay => "Half Day",
});

impl LeaveType {
    /// Types an employee may request through apply-leave
    pub fn is_requestable(&self) -> bool {
        !matches!(self, LeaveType::HalfDay)
    }
}

crate::string_enum!(LeaveStatus, "status" {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub employee_email: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days_count: f64,
    pub reason: String,
    pub status: LeaveStatus,
    /// ManagerAssignment routing; employee id of the deciding manager
    #[serde(default)]
    pub manager_id: Option<String>,
    #[serde(default)]
    pub manager_name: Option<String>,
    #[serde(default)]
    pub manager_reason: Option<String>,
    #[serde(default)]
    pub decided_by: Option<String>,
    pub applied_at: DateTime<Utc>,
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
}

impl Document for LeaveRequest {
    const COLLECTION: &'static str = "leave_requests";
    const LABEL: &'static str = "Leave request";
}

/// Per-quarter allocation, accumulated through the year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveSettings {
    pub id: String,
    pub casual_leave_quarterly: f64,
    pub sick_leave_quarterly: f64,
    pub leave_without_pay_quarterly: f64,
    pub updated_at: DateTime<Utc>,
}

impl Document for LeaveSettings {
    const COLLECTION: &'static str = "leave_settings";
    const LABEL: &'static str = "Leave settings";
}

impl LeaveSettings {
    pub const SINGLETON_ID: &'static str = "default";

    pub fn defaults(now: DateTime<Utc>) -> Self {
        Self {
            id: Self::SINGLETON_ID.to_string(),
            casual_leave_quarterly: 3.0,
            sick_leave_quarterly: 3.0,
            leave_without_pay_quarterly: 5.0,
            updated_at: now,
        }
    }

    pub fn quarterly(&self, leave_type: LeaveType) -> f64 {
        match leave_type {
            LeaveType::CasualLeave => self.casual_leave_quarterly,
            LeaveType::SickLeave => self.sick_leave_quarterly,
            LeaveType::LeaveWithoutPay => self.leave_without_pay_quarterly,
            LeaveType::HalfDay => 0.0,
        }
    }
}
