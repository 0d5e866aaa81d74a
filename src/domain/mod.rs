//! Core business entities, types and traits

pub mod assessment;
pub mod audit;
pub mod error;
pub mod scoring;
pub mod user;

pub use assessment::{
    Assessment, AssessmentFilter, AssessmentRecord, AssessmentRepositoryInterface, NewAssessment,
};
pub use audit::{AuditLogEntry, AuditLogRecord, AuditLogRepositoryInterface};
pub use error::{DomainError, DomainResult};
pub use scoring::{
    calculate_credit_score, credit_history_options, ComponentScores, RiskCategory, ScoreBreakdown,
    ScoreOption,
};
pub use user::{
    CreateUserDto, GetUserDto, UpdateUserDto, User, UserRepositoryInterface, UserRole,
};

/// Unified accessor for all repositories, backed by one connection pool.
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepositoryInterface;
    fn assessments(&self) -> &dyn AssessmentRepositoryInterface;
    fn audit_log(&self) -> &dyn AuditLogRepositoryInterface;
}
