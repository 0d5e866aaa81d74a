use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set,
};

use super::user_repository::db_err;
use crate::domain::{AuditLogEntry, AuditLogRecord, AuditLogRepositoryInterface, DomainResult};
use crate::infrastructure::database::entities::{audit_log, user};

pub struct SeaOrmAuditLogRepository {
    db: DatabaseConnection,
}

impl SeaOrmAuditLogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn audit_model_to_domain(model: audit_log::Model) -> AuditLogEntry {
    AuditLogEntry {
        id: model.id,
        user_id: model.user_id,
        action: model.action,
        details: model.details,
        created_at: model.created_at,
    }
}

#[async_trait]
impl AuditLogRepositoryInterface for SeaOrmAuditLogRepository {
    async fn record(
        &self,
        user_id: Option<&str>,
        action: &str,
        details: Option<&str>,
    ) -> DomainResult<()> {
        let entry = audit_log::ActiveModel {
            user_id: Set(user_id.map(String::from)),
            action: Set(action.to_string()),
            details: Set(details.map(String::from)),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        entry.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn list_recent(&self, limit: u64) -> DomainResult<Vec<AuditLogRecord>> {
        let rows = audit_log::Entity::find()
            .order_by_desc(audit_log::Column::CreatedAt)
            .limit(limit)
            .find_also_related(user::Entity)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let records = rows
            .into_iter()
            .map(|(model, actor)| AuditLogRecord {
                entry: audit_model_to_domain(model),
                username: actor.map(|u| u.username),
            })
            .collect();

        Ok(records)
    }
}
