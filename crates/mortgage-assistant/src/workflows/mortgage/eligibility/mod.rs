mod config;
mod rules;

pub use config::EligibilityPolicy;
pub use rules::Criterion;

pub(crate) use rules::format_amount;

use super::domain::{ApplicantProfile, ProfileField};
use rules::Facts;
use serde::{Deserialize, Serialize};

pub const ELIGIBLE_MESSAGE: &str = "Congratulations! You are eligible for a mortgage loan.";
pub const INELIGIBLE_MESSAGE: &str =
    "Sorry, based on the provided details, you are not eligible for a mortgage loan.";

/// Outcome of applying the eligibility rule to a complete profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityVerdict {
    pub eligible: bool,
    pub message: String,
    pub reasons: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Raised when the rule is applied before every field has been collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot evaluate eligibility: {} has not been provided", .missing.label())]
pub struct IncompleteProfile {
    pub missing: ProfileField,
}

/// Raised when an amount is negative or not a finite number.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("{} must be a finite, non-negative number (got {value})", .field.label())]
pub struct InvalidAmount {
    pub field: ProfileField,
    pub value: f64,
}

/// Shared amount check for every entry point that accepts raw values.
pub fn check_amount(field: ProfileField, value: f64) -> Result<f64, InvalidAmount> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(InvalidAmount { field, value })
    }
}

/// Stateless evaluator applying an [`EligibilityPolicy`] to a profile.
#[derive(Debug, Clone, Default)]
pub struct EligibilityEvaluator {
    policy: EligibilityPolicy,
}

impl EligibilityEvaluator {
    pub fn new(policy: EligibilityPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &EligibilityPolicy {
        &self.policy
    }

    /// Every criterion is checked, so all failures are reported together.
    pub fn evaluate(
        &self,
        profile: &ApplicantProfile,
    ) -> Result<EligibilityVerdict, IncompleteProfile> {
        let facts = facts_from(profile)?;
        Ok(self.verdict_for(&facts))
    }

    /// Same rule for callers that already hold all four values. Amounts are
    /// validated first since they did not pass through the conversation.
    pub fn evaluate_values(
        &self,
        income: f64,
        credit_score: u32,
        loan_amount: f64,
        property_value: f64,
    ) -> Result<EligibilityVerdict, InvalidAmount> {
        let facts = Facts {
            income: check_amount(ProfileField::Income, income)?,
            credit_score,
            loan_amount: check_amount(ProfileField::LoanAmount, loan_amount)?,
            property_value: check_amount(ProfileField::PropertyValue, property_value)?,
        };
        Ok(self.verdict_for(&facts))
    }

    fn verdict_for(&self, facts: &Facts) -> EligibilityVerdict {
        let failed: Vec<Criterion> = Criterion::ALL
            .into_iter()
            .filter(|criterion| rules::fails(*criterion, facts, &self.policy))
            .collect();

        if failed.is_empty() {
            return EligibilityVerdict {
                eligible: true,
                message: ELIGIBLE_MESSAGE.to_string(),
                reasons: Vec::new(),
                suggestions: Vec::new(),
            };
        }

        EligibilityVerdict {
            eligible: false,
            message: INELIGIBLE_MESSAGE.to_string(),
            reasons: failed
                .iter()
                .map(|criterion| rules::reason(*criterion, facts, &self.policy))
                .collect(),
            suggestions: failed
                .iter()
                .map(|criterion| rules::suggestion(*criterion, facts, &self.policy))
                .collect(),
        }
    }
}

/// Applies the default lending rule.
pub fn evaluate(profile: &ApplicantProfile) -> Result<EligibilityVerdict, IncompleteProfile> {
    EligibilityEvaluator::default().evaluate(profile)
}

fn facts_from(profile: &ApplicantProfile) -> Result<Facts, IncompleteProfile> {
    match (
        profile.income,
        profile.credit_score,
        profile.loan_amount,
        profile.property_value,
    ) {
        (Some(income), Some(credit_score), Some(loan_amount), Some(property_value)) => Ok(Facts {
            income,
            credit_score,
            loan_amount,
            property_value,
        }),
        _ => Err(IncompleteProfile {
            missing: profile
                .first_missing()
                .unwrap_or(ProfileField::Income),
        }),
    }
}
