// handlers/employee/mod.rs - Endpoints for an authenticated employee

pub mod breaks;
pub mod calendar;
pub mod leave;
pub mod notifications;
pub mod profile;
pub mod projects;
pub mod sessions;
pub mod tickets;
