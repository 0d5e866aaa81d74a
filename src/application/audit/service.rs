//! Audit log read side. Writes happen inside the other services.

use std::sync::Arc;

use crate::domain::{AuditLogRecord, DomainResult, RepositoryProvider};

use super::super::assessments::AssessmentExporter;

/// Hard ceiling on how many entries a single read returns.
pub const MAX_AUDIT_ENTRIES: u64 = 500;

pub struct AuditService {
    repos: Arc<dyn RepositoryProvider>,
    exporter: AssessmentExporter,
}

impl AuditService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            repos,
            exporter: AssessmentExporter::new(),
        }
    }

    /// Latest entries, newest first. `limit` is clamped to the ceiling.
    pub async fn list_recent(&self, limit: Option<u64>) -> DomainResult<Vec<AuditLogRecord>> {
        let limit = limit.unwrap_or(MAX_AUDIT_ENTRIES).min(MAX_AUDIT_ENTRIES);
        self.repos.audit_log().list_recent(limit).await
    }

    /// CSV export of the latest entries.
    pub async fn export_csv(&self, limit: Option<u64>) -> DomainResult<String> {
        let records = self.list_recent(limit).await?;
        Ok(self.exporter.format_audit_csv(&records))
    }
}
