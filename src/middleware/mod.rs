pub mod auth;

pub use auth::{admin_auth_middleware, employee_auth_middleware, CurrentAdmin, CurrentEmployee};
