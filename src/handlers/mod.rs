// handlers/mod.rs - Request handlers grouped by who may call them
//
// public   → no authentication (register, login, health)
// employee → employee bearer token
// manager  → employee bearer token; manager assignment checked per request
// admin    → admin bearer token

pub mod admin;
pub mod employee;
pub mod manager;
pub mod public;
pub mod utils;
