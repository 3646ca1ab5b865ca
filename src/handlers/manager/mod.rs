// handlers/manager/mod.rs - Leave approvals for employees holding a manager assignment

pub mod leave;
