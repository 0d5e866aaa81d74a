//! SeaORM entities

pub mod assessment;
pub mod audit_log;
pub mod user;
