//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{
    AssessmentRepositoryInterface, AuditLogRepositoryInterface, RepositoryProvider,
    UserRepositoryInterface,
};

use super::assessment_repository::SeaOrmAssessmentRepository;
use super::audit_repository::SeaOrmAuditLogRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    assessments: SeaOrmAssessmentRepository,
    audit_log: SeaOrmAuditLogRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            assessments: SeaOrmAssessmentRepository::new(db.clone()),
            audit_log: SeaOrmAuditLogRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepositoryInterface {
        &self.users
    }

    fn assessments(&self) -> &dyn AssessmentRepositoryInterface {
        &self.assessments
    }

    fn audit_log(&self) -> &dyn AuditLogRepositoryInterface {
        &self.audit_log
    }
}
