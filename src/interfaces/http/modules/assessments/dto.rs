//! Assessment DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Assessment, ScoreBreakdown, ScoreOption};

/// Component selections submitted from the wizard. The composite score is
/// never accepted from the client; it is recomputed server-side.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitAssessmentRequest {
    #[validate(length(min = 1, max = 255, message = "customer name is required"))]
    pub customer_name: String,
    pub is_new_customer: bool,
    #[validate(range(min = 1, max = 10, message = "credit_history must be 1-10"))]
    pub credit_history: i32,
    #[validate(range(min = 1, max = 10, message = "income_stability must be 1-10"))]
    pub income_stability: i32,
    #[validate(range(min = 1, max = 10, message = "location must be 1-10"))]
    pub location: i32,
    #[validate(range(min = 1, max = 10, message = "banking_access must be 1-10"))]
    pub banking_access: i32,
    #[validate(range(min = 1, max = 10, message = "referral must be 1-10"))]
    pub referral: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssessmentDto {
    pub id: i32,
    pub customer_name: String,
    pub is_new_customer: bool,
    pub credit_history: i32,
    pub income_stability: i32,
    pub location: i32,
    pub banking_access: i32,
    pub referral: i32,
    /// Weighted composite score in [1.0, 10.0]
    pub credit_score: f64,
    pub risk_category: String,
    pub recommended_products: String,
    pub created_at: DateTime<Utc>,
}

impl From<Assessment> for AssessmentDto {
    fn from(a: Assessment) -> Self {
        Self {
            id: a.id,
            customer_name: a.customer_name,
            is_new_customer: a.is_new_customer,
            credit_history: a.scores.credit_history,
            income_stability: a.scores.income_stability,
            location: a.scores.location,
            banking_access: a.scores.banking_access,
            referral: a.scores.referral,
            credit_score: a.credit_score,
            risk_category: a.risk_category,
            recommended_products: a.recommended_products,
            created_at: a.created_at,
        }
    }
}

/// Per-factor weighted contributions to the composite score.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreBreakdownDto {
    pub credit_history: f64,
    pub income_stability: f64,
    pub location: f64,
    pub banking_access: f64,
    pub referral: f64,
}

impl From<ScoreBreakdown> for ScoreBreakdownDto {
    fn from(b: ScoreBreakdown) -> Self {
        Self {
            credit_history: b.credit_history,
            income_stability: b.income_stability,
            location: b.location,
            banking_access: b.banking_access,
            referral: b.referral,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssessmentResultDto {
    pub assessment: AssessmentDto,
    pub breakdown: ScoreBreakdownDto,
}

/// One selectable row of a factor lookup table.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreOptionDto {
    pub label: &'static str,
    pub score: i32,
}

fn to_options(table: &'static [ScoreOption]) -> Vec<ScoreOptionDto> {
    table
        .iter()
        .map(|o| ScoreOptionDto {
            label: o.label,
            score: o.score,
        })
        .collect()
}

/// The five factor lookup tables the wizard presents. The credit history
/// table differs for new versus existing customers.
#[derive(Debug, Serialize, ToSchema)]
pub struct AssessmentOptionsResponse {
    pub credit_history: Vec<ScoreOptionDto>,
    pub income_stability: Vec<ScoreOptionDto>,
    pub location: Vec<ScoreOptionDto>,
    pub banking_access: Vec<ScoreOptionDto>,
    pub referral: Vec<ScoreOptionDto>,
}

impl AssessmentOptionsResponse {
    pub fn for_customer(is_new_customer: bool) -> Self {
        use crate::domain::scoring::{
            credit_history_options, BANKING_ACCESS, INCOME_STABILITY, LOCATION, REFERRAL,
        };
        Self {
            credit_history: to_options(credit_history_options(is_new_customer)),
            income_stability: to_options(INCOME_STABILITY),
            location: to_options(LOCATION),
            banking_access: to_options(BANKING_ACCESS),
            referral: to_options(REFERRAL),
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct OptionsParams {
    /// Whether the customer has no prior relationship. Default: false
    #[serde(default)]
    pub new_customer: bool,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListAssessmentsParams {
    /// Inclusive lower bound on assessment date (YYYY-MM-DD)
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on assessment date (YYYY-MM-DD)
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ExportParams {
    /// Inclusive lower bound on assessment date (YYYY-MM-DD)
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on assessment date (YYYY-MM-DD)
    pub end_date: Option<NaiveDate>,
    /// `csv` (default) or `json`
    pub format: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}
