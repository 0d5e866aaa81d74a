use async_trait::async_trait;

use super::AuditLogRecord;
use crate::domain::DomainResult;

#[async_trait]
pub trait AuditLogRepositoryInterface: Send + Sync {
    /// Append an entry. Append-only: there is no update or delete.
    async fn record(
        &self,
        user_id: Option<&str>,
        action: &str,
        details: Option<&str>,
    ) -> DomainResult<()>;

    /// Latest entries joined with usernames, newest first, capped at `limit`.
    async fn list_recent(&self, limit: u64) -> DomainResult<Vec<AuditLogRecord>>;
}
