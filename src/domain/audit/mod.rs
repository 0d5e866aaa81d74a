//! Audit log aggregate — append-only record of operator actions

pub mod repository;

pub use repository::AuditLogRepositoryInterface;

use chrono::{DateTime, Utc};

/// A single audit entry. `user_id` is nullable so entries survive the
/// deletion of the acting user.
#[derive(Clone, Debug)]
pub struct AuditLogEntry {
    pub id: i32,
    pub user_id: Option<String>,
    pub action: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Audit entry joined with the acting user's name for display/export.
#[derive(Clone, Debug)]
pub struct AuditLogRecord {
    pub entry: AuditLogEntry,
    pub username: Option<String>,
}
