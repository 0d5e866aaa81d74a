//! HTTP API modules, one per resource

pub mod assessments;
pub mod audit;
pub mod auth;
pub mod health;
pub mod users;
