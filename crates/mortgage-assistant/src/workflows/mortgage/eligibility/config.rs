use serde::{Deserialize, Serialize};

/// Thresholds applied by the eligibility rule. The default is the published
/// lending rule: 30,000 monthly income, 650 credit score, 80% loan-to-value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityPolicy {
    pub minimum_monthly_income: f64,
    pub minimum_credit_score: u32,
    pub maximum_loan_to_value: f64,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            minimum_monthly_income: 30_000.0,
            minimum_credit_score: 650,
            maximum_loan_to_value: 0.8,
        }
    }
}

impl EligibilityPolicy {
    pub fn maximum_loan_for(&self, property_value: f64) -> f64 {
        self.maximum_loan_to_value * property_value
    }
}
