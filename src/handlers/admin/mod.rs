// handlers/admin/mod.rs - Endpoints behind the admin bearer token

pub mod admins;
pub mod auth;
pub mod employees;
pub mod holidays;
pub mod leave;
pub mod org;
pub mod reports;
pub mod settings;
pub mod tickets;
