//! Audit log DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::AuditLogRecord;

#[derive(Debug, Serialize, ToSchema)]
pub struct AuditLogDto {
    pub id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Username of the acting user, absent when the user was deleted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AuditLogRecord> for AuditLogDto {
    fn from(record: AuditLogRecord) -> Self {
        Self {
            id: record.entry.id,
            user_id: record.entry.user_id,
            username: record.username,
            action: record.entry.action,
            details: record.entry.details,
            created_at: record.entry.created_at,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AuditListParams {
    /// Maximum entries to return, capped at 500
    pub limit: Option<u64>,
}
