use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::user_repository::db_err;
use crate::domain::{
    Assessment, AssessmentFilter, AssessmentRecord, AssessmentRepositoryInterface,
    ComponentScores, DomainResult, NewAssessment,
};
use crate::infrastructure::database::entities::{assessment, user};
use crate::shared::PaginatedResult;

pub struct SeaOrmAssessmentRepository {
    db: DatabaseConnection,
}

impl SeaOrmAssessmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn assessment_model_to_domain(model: assessment::Model) -> Assessment {
    Assessment {
        id: model.id,
        user_id: model.user_id,
        customer_name: model.customer_name,
        is_new_customer: model.is_new_customer,
        scores: ComponentScores {
            credit_history: model.credit_history,
            income_stability: model.income_stability,
            location: model.location,
            banking_access: model.banking_access,
            referral: model.referral,
        },
        credit_score: model.credit_score,
        risk_category: model.risk_category,
        recommended_products: model.recommended_products,
        created_at: model.created_at,
    }
}

fn apply_date_filter(
    mut query: sea_orm::Select<assessment::Entity>,
    filter: &AssessmentFilter,
) -> sea_orm::Select<assessment::Entity> {
    if let Some(from) = filter.from {
        query = query.filter(assessment::Column::CreatedAt.gte(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(assessment::Column::CreatedAt.lte(to));
    }
    query
}

#[async_trait]
impl AssessmentRepositoryInterface for SeaOrmAssessmentRepository {
    async fn insert(&self, new: NewAssessment) -> DomainResult<Assessment> {
        let model = assessment::ActiveModel {
            user_id: Set(new.user_id),
            customer_name: Set(new.customer_name),
            is_new_customer: Set(new.is_new_customer),
            credit_history: Set(new.scores.credit_history),
            income_stability: Set(new.scores.income_stability),
            location: Set(new.scores.location),
            banking_access: Set(new.scores.banking_access),
            referral: Set(new.scores.referral),
            credit_score: Set(new.credit_score),
            risk_category: Set(new.risk_category),
            recommended_products: Set(new.recommended_products),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(assessment_model_to_domain(inserted))
    }

    async fn get_by_id(&self, id: i32) -> DomainResult<Option<Assessment>> {
        let model = assessment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(assessment_model_to_domain))
    }

    async fn list(&self, filter: AssessmentFilter) -> DomainResult<PaginatedResult<Assessment>> {
        let page = filter.page.unwrap_or(1).max(1);
        let page_size = filter.page_size.unwrap_or(20).clamp(1, 100);

        let query = apply_date_filter(assessment::Entity::find(), &filter)
            .order_by_desc(assessment::Column::CreatedAt);

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let offset = (page as u64 - 1) * page_size as u64;
        let models = query
            .offset(offset)
            .limit(page_size as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items: Vec<Assessment> = models
            .into_iter()
            .map(assessment_model_to_domain)
            .collect();

        Ok(PaginatedResult::new(items, total, page, page_size))
    }

    async fn list_for_export(
        &self,
        filter: AssessmentFilter,
    ) -> DomainResult<Vec<AssessmentRecord>> {
        let rows = apply_date_filter(assessment::Entity::find(), &filter)
            .order_by_desc(assessment::Column::CreatedAt)
            .find_also_related(user::Entity)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let records = rows
            .into_iter()
            .map(|(model, author)| AssessmentRecord {
                assessment: assessment_model_to_domain(model),
                assessed_by: author.map(|u| u.full_name).unwrap_or_default(),
            })
            .collect();

        Ok(records)
    }
}
