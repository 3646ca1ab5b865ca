pub mod admin;
pub mod employee;
pub mod holiday;
pub mod leave;
pub mod notification;
pub mod org;
pub mod session;
pub mod settings;
pub mod ticket;

pub use admin::{Admin, AdminProfile};
pub use employee::{Employee, EmployeeProfile, EmployeeStatus};
pub use holiday::{Holiday, HolidayType};
pub use leave::{LeaveRequest, LeaveSettings, LeaveStatus, LeaveType};
pub use notification::Notification;
pub use org::{Department, ManagerAssignment, Project};
pub use session::{Break, Timesheet, TimesheetStatus, WorkSession};
pub use settings::OrganizationSettings;
pub use ticket::{ItTicket, TicketCategory, TicketPriority, TicketStatus};

/// New document id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
