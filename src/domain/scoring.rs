//! Credit scoring calculator
//!
//! Pure functions, no I/O. A customer is rated on five factors, each an
//! ordinal score in 1..=10 picked from a fixed lookup table of descriptive
//! labels. The composite score is a weighted sum over the five factors,
//! then bucketed into a risk category that maps to a product tier.

use serde::{Deserialize, Serialize};

/// Factor weights. Must sum to 1.0 so the composite stays in [1, 10].
pub const WEIGHT_CREDIT_HISTORY: f64 = 0.30;
pub const WEIGHT_INCOME_STABILITY: f64 = 0.25;
pub const WEIGHT_LOCATION: f64 = 0.15;
pub const WEIGHT_BANKING_ACCESS: f64 = 0.20;
pub const WEIGHT_REFERRAL: f64 = 0.10;

/// The five component scores of an assessment, each in 1..=10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub credit_history: i32,
    pub income_stability: i32,
    pub location: i32,
    pub banking_access: i32,
    pub referral: i32,
}

impl ComponentScores {
    /// Validate that every component is in the 1..=10 range.
    pub fn validate(&self) -> Result<(), String> {
        let components = [
            ("credit_history", self.credit_history),
            ("income_stability", self.income_stability),
            ("location", self.location),
            ("banking_access", self.banking_access),
            ("referral", self.referral),
        ];
        for (name, value) in components {
            if !(1..=10).contains(&value) {
                return Err(format!("{} must be between 1 and 10, got {}", name, value));
            }
        }
        Ok(())
    }
}

/// Weighted composite credit score in [1.0, 10.0].
pub fn calculate_credit_score(scores: &ComponentScores) -> f64 {
    scores.credit_history as f64 * WEIGHT_CREDIT_HISTORY
        + scores.income_stability as f64 * WEIGHT_INCOME_STABILITY
        + scores.location as f64 * WEIGHT_LOCATION
        + scores.banking_access as f64 * WEIGHT_BANKING_ACCESS
        + scores.referral as f64 * WEIGHT_REFERRAL
}

/// Risk bucket derived from the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCategory {
    LowRisk,
    MediumRisk,
    HighRisk,
    Rejected,
}

impl RiskCategory {
    /// Bucket a composite score:
    /// `> 8` Low, `[5, 8]` Medium, `[3, 5)` High, `< 3` Rejected.
    pub fn from_score(score: f64) -> Self {
        if score > 8.0 {
            Self::LowRisk
        } else if score >= 5.0 {
            Self::MediumRisk
        } else if score >= 3.0 {
            Self::HighRisk
        } else {
            Self::Rejected
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LowRisk => "Low Risk",
            Self::MediumRisk => "Medium Risk",
            Self::HighRisk => "High Risk",
            Self::Rejected => "Rejected",
        }
    }

    /// Product tier recommended for this risk bucket. Total over all buckets.
    pub fn recommended_products(&self) -> &'static str {
        match self {
            Self::LowRisk => "All Products",
            Self::MediumRisk => "Mid Value Products",
            Self::HighRisk => "Low Value Products",
            Self::Rejected => "Rejected (No Products Recommended)",
        }
    }
}

/// Per-factor weighted contributions, shown to the operator on the
/// results step of the wizard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub credit_history: f64,
    pub income_stability: f64,
    pub location: f64,
    pub banking_access: f64,
    pub referral: f64,
}

impl ScoreBreakdown {
    pub fn from_scores(scores: &ComponentScores) -> Self {
        Self {
            credit_history: scores.credit_history as f64 * WEIGHT_CREDIT_HISTORY,
            income_stability: scores.income_stability as f64 * WEIGHT_INCOME_STABILITY,
            location: scores.location as f64 * WEIGHT_LOCATION,
            banking_access: scores.banking_access as f64 * WEIGHT_BANKING_ACCESS,
            referral: scores.referral as f64 * WEIGHT_REFERRAL,
        }
    }
}

/// One selectable row of a factor lookup table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreOption {
    pub label: &'static str,
    pub score: i32,
}

const fn opt(label: &'static str, score: i32) -> ScoreOption {
    ScoreOption { label, score }
}

/// Credit history table for customers with no prior relationship,
/// rated on observed transaction patterns.
pub const NEW_CUSTOMER_CREDIT_HISTORY: &[ScoreOption] = &[
    opt("Regular inflows and outflows, consistent savings, and no loans.", 10),
    opt("Regular inflows and outflows, no savings, and no loans.", 9),
    opt("Regular inflows and outflows, no savings, with loans.", 8),
    opt("Moderate transaction activity, consistent savings, and no loans.", 7),
    opt("Moderate transaction activity, no savings, and no loans.", 6),
    opt("Moderate transaction activity, no savings, with loans.", 5),
    opt("Irregular transactions, consistent savings, and no loans.", 4),
    opt("Irregular transactions, no savings, and no loans.", 3),
    opt("Irregular transactions, no savings, with loans.", 2),
    opt("No credit history data.", 1),
];

/// Credit history table for returning customers, rated on repayment
/// collections rate.
pub const EXISTING_CUSTOMER_CREDIT_HISTORY: &[ScoreOption] = &[
    opt("100% Collections Rate", 10),
    opt("90% Collections Rate", 9),
    opt("80% Collections Rate", 8),
    opt("70% Collections Rate", 7),
    opt("60% Collections Rate", 6),
    opt("50% Collections Rate", 5),
    opt("40% Collections Rate", 4),
    opt("30% Collections Rate", 3),
    opt("20% Collections Rate", 2),
    opt("10% Collections Rate", 1),
];

pub const INCOME_STABILITY: &[ScoreOption] = &[
    opt("Stable salary (e.g., government job) - Above 10,000 ZMW", 10),
    opt("Stable salary (e.g., government job) - 7,000 - 10,000 ZMW", 9),
    opt("Stable salary (e.g., government job) - 5,000 - 6,999 ZMW", 8),
    opt("Regular business income (e.g., small shop) - 3,000 - 4,999 ZMW", 7),
    opt("Regular business income (e.g., small shop) - 2,000 - 2,999 ZMW", 6),
    opt("Seasonal income (e.g., farming) - 1,000 - 1,999 ZMW", 5),
    opt("Seasonal income (e.g., farming) - 500 - 999 ZMW", 4),
    opt("Irregular income (e.g., casual labor) - 300 - 499 ZMW", 3),
    opt("Irregular income (e.g., casual labor) - 100 - 299 ZMW", 2),
    opt("Irregular income (e.g., casual labor) - Below 100 ZMW", 1),
];

/// Distance from the nearest agent or service center.
pub const LOCATION: &[ScoreOption] = &[
    opt("Less than 1 km", 10),
    opt("1 - 5 km", 9),
    opt("5 - 10 km", 8),
    opt("10 - 20 km", 7),
    opt("20 - 30 km", 6),
    opt("30 - 50 km", 5),
    opt("50 - 70 km", 4),
    opt("70 - 100 km", 3),
    opt("100 - 150 km", 2),
    opt("More than 150 km", 1),
];

pub const BANKING_ACCESS: &[ScoreOption] = &[
    opt(
        "Access to all financial services (traditional banking, mobile money, agent networks, SACCOs, etc.).",
        10,
    ),
    opt("Access to traditional banking services, mobile money platforms, and agent networks.", 9),
    opt("Access to traditional banking services and mobile money platforms.", 8),
    opt("Access to traditional banking services (e.g., bank account)", 7),
    opt("Access to mobile money platforms, agent networks, and SACCOs.", 6),
    opt("Access to mobile money platforms, agent networks, and informal savings groups.", 5),
    opt("Access to mobile money platforms and agent banking networks.", 4),
    opt("Access to mobile money platforms only (e.g., Airtel Money, MTN Mobile Money).", 3),
    opt("Access to mobile money agents only.", 2),
    opt("No access to any financial services.", 1),
];

pub const REFERRAL: &[ScoreOption] = &[
    opt("Sales Agent/Staff (VITALITE)", 10),
    opt("Existing Customer (good repayment history)", 9),
    opt("Employer (formal employment)", 8),
    opt("Commissioner of Oaths (legal authority)", 7),
    opt("Community Leader (e.g., village head, pastor)", 6),
    opt("Next of Kin (immediate family member)", 5),
    opt("Local Business Owner (established business)", 4),
    opt("Teacher/Educator (recognized professional)", 3),
    opt("Neighbor (known to the customer)", 2),
    opt("No Referral/Guarantor", 1),
];

/// Credit history table for the given customer status.
pub fn credit_history_options(is_new_customer: bool) -> &'static [ScoreOption] {
    if is_new_customer {
        NEW_CUSTOMER_CREDIT_HISTORY
    } else {
        EXISTING_CUSTOMER_CREDIT_HISTORY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(value: i32) -> ComponentScores {
        ComponentScores {
            credit_history: value,
            income_stability: value,
            location: value,
            banking_access: value,
            referral: value,
        }
    }

    #[test]
    fn all_tens_scores_ten_and_recommends_everything() {
        let score = calculate_credit_score(&uniform(10));
        assert!((score - 10.0).abs() < 1e-9);
        let category = RiskCategory::from_score(score);
        assert_eq!(category, RiskCategory::LowRisk);
        assert_eq!(category.recommended_products(), "All Products");
    }

    #[test]
    fn all_ones_scores_one_and_rejects() {
        let score = calculate_credit_score(&uniform(1));
        assert!((score - 1.0).abs() < 1e-9);
        let category = RiskCategory::from_score(score);
        assert_eq!(category, RiskCategory::Rejected);
        assert_eq!(
            category.recommended_products(),
            "Rejected (No Products Recommended)"
        );
    }

    #[test]
    fn score_is_bounded_for_all_valid_inputs() {
        for value in 1..=10 {
            let score = calculate_credit_score(&uniform(value));
            assert!((1.0..=10.0).contains(&score), "score {} out of range", score);
        }
    }

    #[test]
    fn category_boundaries() {
        assert_eq!(RiskCategory::from_score(8.0), RiskCategory::MediumRisk);
        assert_eq!(RiskCategory::from_score(8.01), RiskCategory::LowRisk);
        assert_eq!(RiskCategory::from_score(5.0), RiskCategory::MediumRisk);
        assert_eq!(RiskCategory::from_score(4.99), RiskCategory::HighRisk);
        assert_eq!(RiskCategory::from_score(3.0), RiskCategory::HighRisk);
        assert_eq!(RiskCategory::from_score(2.99), RiskCategory::Rejected);
    }

    #[test]
    fn weights_sum_to_one() {
        let total = WEIGHT_CREDIT_HISTORY
            + WEIGHT_INCOME_STABILITY
            + WEIGHT_LOCATION
            + WEIGHT_BANKING_ACCESS
            + WEIGHT_REFERRAL;
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn weighted_sum_matches_hand_computed_example() {
        let scores = ComponentScores {
            credit_history: 8,
            income_stability: 7,
            location: 9,
            banking_access: 6,
            referral: 5,
        };
        let score = calculate_credit_score(&scores);
        // 8*0.30 + 7*0.25 + 9*0.15 + 6*0.20 + 5*0.10 = 7.20
        assert!((score - 7.2).abs() < 1e-9);
        assert_eq!(RiskCategory::from_score(score), RiskCategory::MediumRisk);
    }

    #[test]
    fn breakdown_sums_to_composite() {
        let scores = ComponentScores {
            credit_history: 3,
            income_stability: 9,
            location: 2,
            banking_access: 7,
            referral: 10,
        };
        let breakdown = ScoreBreakdown::from_scores(&scores);
        let sum = breakdown.credit_history
            + breakdown.income_stability
            + breakdown.location
            + breakdown.banking_access
            + breakdown.referral;
        assert!((sum - calculate_credit_score(&scores)).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_components_are_rejected() {
        let mut scores = uniform(5);
        scores.location = 0;
        assert!(scores.validate().is_err());
        scores.location = 11;
        assert!(scores.validate().is_err());
        scores.location = 10;
        assert!(scores.validate().is_ok());
    }

    #[test]
    fn lookup_tables_cover_full_ordinal_range() {
        for table in [
            NEW_CUSTOMER_CREDIT_HISTORY,
            EXISTING_CUSTOMER_CREDIT_HISTORY,
            INCOME_STABILITY,
            LOCATION,
            BANKING_ACCESS,
            REFERRAL,
        ] {
            assert_eq!(table.len(), 10);
            let mut seen: Vec<i32> = table.iter().map(|o| o.score).collect();
            seen.sort_unstable();
            assert_eq!(seen, (1..=10).collect::<Vec<_>>());
        }
    }
}
