//! Assessment aggregate — model, DTOs and repository interface
//!
//! Assessments are insert-only: once the wizard completes and the result is
//! saved, the record never changes.

pub mod repository;

pub use repository::AssessmentRepositoryInterface;

use chrono::{DateTime, Utc};

use crate::domain::scoring::ComponentScores;

/// A completed credit assessment.
#[derive(Clone, Debug)]
pub struct Assessment {
    pub id: i32,
    pub user_id: String,
    pub customer_name: String,
    pub is_new_customer: bool,
    pub scores: ComponentScores,
    pub credit_score: f64,
    pub risk_category: String,
    pub recommended_products: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for persisting a new assessment. The composite score, category and
/// product recommendation are computed by the service before insert.
#[derive(Debug, Clone)]
pub struct NewAssessment {
    pub user_id: String,
    pub customer_name: String,
    pub is_new_customer: bool,
    pub scores: ComponentScores,
    pub credit_score: f64,
    pub risk_category: String,
    pub recommended_products: String,
}

/// List/export filter. Dates bound `created_at` inclusively.
#[derive(Debug, Clone, Default)]
pub struct AssessmentFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Assessment joined with the full name of the operator who ran it,
/// as exported to tabular files.
#[derive(Clone, Debug)]
pub struct AssessmentRecord {
    pub assessment: Assessment,
    pub assessed_by: String,
}
