pub mod calendar;
pub mod holidays;
pub mod leave;
pub mod logo;
pub mod notifications;
pub mod org_tree;
pub mod seed;
pub mod worktime;
