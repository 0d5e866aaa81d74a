//! Assessment use-cases: score, persist, list, export

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    calculate_credit_score, Assessment, AssessmentFilter, ComponentScores, DomainError,
    DomainResult, NewAssessment, RepositoryProvider, RiskCategory, ScoreBreakdown,
};
use crate::shared::PaginatedResult;

use super::exporter::{AssessmentExporter, ExportFormat, ExportOutput};

/// A scored, persisted assessment together with its breakdown for display.
#[derive(Debug, Clone)]
pub struct AssessmentResult {
    pub assessment: Assessment,
    pub breakdown: ScoreBreakdown,
}

pub struct AssessmentService {
    repos: Arc<dyn RepositoryProvider>,
    exporter: AssessmentExporter,
}

impl AssessmentService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            repos,
            exporter: AssessmentExporter::new(),
        }
    }

    async fn audit(&self, user_id: &str, action: &str, details: &str) {
        if let Err(e) = self
            .repos
            .audit_log()
            .record(Some(user_id), action, Some(details))
            .await
        {
            warn!(action, "Failed to write audit entry: {}", e);
        }
    }

    /// Score the submitted component selections and persist the result.
    ///
    /// The composite score, risk category and product recommendation are
    /// computed here; the stored record is immutable afterwards.
    pub async fn submit(
        &self,
        user_id: &str,
        customer_name: &str,
        is_new_customer: bool,
        scores: ComponentScores,
    ) -> DomainResult<AssessmentResult> {
        let customer_name = customer_name.trim();
        if customer_name.is_empty() {
            return Err(DomainError::Validation("Customer name is required".into()));
        }
        scores.validate().map_err(DomainError::Validation)?;

        let credit_score = calculate_credit_score(&scores);
        let category = RiskCategory::from_score(credit_score);

        let assessment = self
            .repos
            .assessments()
            .insert(NewAssessment {
                user_id: user_id.to_string(),
                customer_name: customer_name.to_string(),
                is_new_customer,
                scores,
                credit_score,
                risk_category: category.as_str().to_string(),
                recommended_products: category.recommended_products().to_string(),
            })
            .await?;

        self.audit(
            user_id,
            "save_assessment",
            &format!("Saved assessment for {}", customer_name),
        )
        .await;

        info!(
            customer = customer_name,
            score = format!("{:.2}", credit_score),
            category = category.as_str(),
            "Assessment saved"
        );

        Ok(AssessmentResult {
            breakdown: ScoreBreakdown::from_scores(&scores),
            assessment,
        })
    }

    pub async fn get_by_id(&self, id: i32) -> DomainResult<Option<Assessment>> {
        self.repos.assessments().get_by_id(id).await
    }

    pub async fn list(&self, filter: AssessmentFilter) -> DomainResult<PaginatedResult<Assessment>> {
        self.repos.assessments().list(filter).await
    }

    /// Date-range filtered tabular export, joined with assessor names.
    pub async fn export(
        &self,
        user_id: &str,
        filter: AssessmentFilter,
        format: ExportFormat,
    ) -> DomainResult<ExportOutput> {
        let records = self.repos.assessments().list_for_export(filter).await?;

        if records.is_empty() {
            return Err(DomainError::NotFound {
                entity: "Assessment",
                field: "date range",
                value: "no assessments in range".to_string(),
            });
        }

        let output = self.exporter.export(&records, format)?;

        self.audit(
            user_id,
            "export_assessments",
            &format!("Exported {} assessments as {}", records.len(), format.as_str()),
        )
        .await;

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use crate::domain::CreateUserDto;
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;

    async fn setup() -> (AssessmentService, String) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));

        repos
            .users()
            .create_user(CreateUserDto {
                username: "officer".into(),
                password: "password123".into(),
                full_name: "Loan Officer".into(),
                role: None,
            })
            .await
            .unwrap();
        let user_id = repos
            .users()
            .get_user_by_username("officer")
            .await
            .unwrap()
            .unwrap()
            .id;

        (AssessmentService::new(repos), user_id)
    }

    fn good_scores() -> ComponentScores {
        ComponentScores {
            credit_history: 8,
            income_stability: 7,
            location: 6,
            banking_access: 7,
            referral: 5,
        }
    }

    #[tokio::test]
    async fn submit_computes_score_and_persists() {
        let (service, user_id) = setup().await;

        let result = service
            .submit(&user_id, "Acme Traders", true, good_scores())
            .await
            .unwrap();

        // 8*0.30 + 7*0.25 + 6*0.15 + 7*0.20 + 5*0.10 = 6.95
        assert!((result.assessment.credit_score - 6.95).abs() < 1e-9);
        assert_eq!(result.assessment.risk_category, "Medium Risk");
        assert_eq!(result.assessment.recommended_products, "Mid Value Products");
        assert_eq!(result.assessment.customer_name, "Acme Traders");

        let stored = service
            .get_by_id(result.assessment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.scores, good_scores());
    }

    #[tokio::test]
    async fn submit_rejects_blank_name_and_bad_scores() {
        let (service, user_id) = setup().await;

        let err = service
            .submit(&user_id, "   ", true, good_scores())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let mut scores = good_scores();
        scores.referral = 11;
        let err = service
            .submit(&user_id, "Acme", true, scores)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn list_filters_by_date_range() {
        let (service, user_id) = setup().await;
        service
            .submit(&user_id, "Acme", true, good_scores())
            .await
            .unwrap();

        let now = Utc::now();
        let hit = service
            .list(AssessmentFilter {
                from: Some(now - Duration::hours(1)),
                to: Some(now + Duration::hours(1)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(hit.total, 1);

        let miss = service
            .list(AssessmentFilter {
                from: Some(now + Duration::hours(1)),
                to: None,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(miss.total, 0);
    }

    #[tokio::test]
    async fn list_far_beyond_last_page_returns_empty() {
        let (service, user_id) = setup().await;
        service
            .submit(&user_id, "Acme", true, good_scores())
            .await
            .unwrap();

        let result = service
            .list(AssessmentFilter {
                page: Some(u32::MAX),
                page_size: Some(100),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(result.total, 1);
        assert!(result.items.is_empty());
    }

    #[tokio::test]
    async fn export_joins_assessor_name() {
        let (service, user_id) = setup().await;
        service
            .submit(&user_id, "Acme, Inc.", false, good_scores())
            .await
            .unwrap();

        let output = service
            .export(&user_id, AssessmentFilter::default(), ExportFormat::Csv)
            .await
            .unwrap();
        assert!(output.content_type.starts_with("text/csv"));
        assert!(output.body.starts_with("customer_name,"));
        // Comma in the name forces quoting; assessor full name is joined in.
        assert!(output.body.contains("\"Acme, Inc.\""));
        assert!(output.body.contains("Loan Officer"));
    }

    #[tokio::test]
    async fn export_of_empty_range_is_not_found() {
        let (service, user_id) = setup().await;
        let err = service
            .export(&user_id, AssessmentFilter::default(), ExportFormat::Json)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
