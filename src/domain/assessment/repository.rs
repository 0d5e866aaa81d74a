use async_trait::async_trait;

use super::{Assessment, AssessmentFilter, AssessmentRecord, NewAssessment};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait AssessmentRepositoryInterface: Send + Sync {
    /// Insert a completed assessment and return the stored row.
    async fn insert(&self, assessment: NewAssessment) -> DomainResult<Assessment>;

    async fn get_by_id(&self, id: i32) -> DomainResult<Option<Assessment>>;

    /// Newest-first page of assessments matching the filter.
    async fn list(&self, filter: AssessmentFilter) -> DomainResult<PaginatedResult<Assessment>>;

    /// All assessments in the filter's date range joined with the
    /// assessor's full name, newest first. Unpaginated, used for export.
    async fn list_for_export(
        &self,
        filter: AssessmentFilter,
    ) -> DomainResult<Vec<AssessmentRecord>>;
}
