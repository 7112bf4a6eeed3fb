use super::config::EligibilityPolicy;
use serde::{Deserialize, Serialize};

/// Individual checks of the eligibility rule, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    IncomeFloor,
    CreditScoreFloor,
    LoanToValueCeiling,
}

impl Criterion {
    pub const ALL: [Criterion; 3] = [
        Criterion::IncomeFloor,
        Criterion::CreditScoreFloor,
        Criterion::LoanToValueCeiling,
    ];
}

/// A fully collected profile, unwrapped for rule evaluation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Facts {
    pub income: f64,
    pub credit_score: u32,
    pub loan_amount: f64,
    pub property_value: f64,
}

pub(crate) fn fails(criterion: Criterion, facts: &Facts, policy: &EligibilityPolicy) -> bool {
    match criterion {
        Criterion::IncomeFloor => facts.income < policy.minimum_monthly_income,
        Criterion::CreditScoreFloor => facts.credit_score < policy.minimum_credit_score,
        Criterion::LoanToValueCeiling => {
            facts.loan_amount > policy.maximum_loan_for(facts.property_value)
        }
    }
}

pub(crate) fn reason(criterion: Criterion, facts: &Facts, policy: &EligibilityPolicy) -> String {
    match criterion {
        Criterion::IncomeFloor => format!(
            "Your income of {} is less than the required {} INR per month.",
            format_amount(facts.income),
            format_amount(policy.minimum_monthly_income)
        ),
        Criterion::CreditScoreFloor => format!(
            "Your credit score of {} is below the required {}.",
            facts.credit_score, policy.minimum_credit_score
        ),
        Criterion::LoanToValueCeiling => format!(
            "The loan amount of {} exceeds {}% of the property value.",
            format_amount(facts.loan_amount),
            format_amount(policy.maximum_loan_to_value * 100.0)
        ),
    }
}

pub(crate) fn suggestion(criterion: Criterion, facts: &Facts, policy: &EligibilityPolicy) -> String {
    match criterion {
        Criterion::IncomeFloor => format!(
            "Consider increasing your monthly income to meet the {} INR minimum.",
            format_amount(policy.minimum_monthly_income)
        ),
        Criterion::CreditScoreFloor => format!(
            "Consider improving your credit score to at least {}.",
            policy.minimum_credit_score
        ),
        Criterion::LoanToValueCeiling => format!(
            "Consider applying for a smaller loan amount (max {}).",
            format_amount(policy.maximum_loan_for(facts.property_value))
        ),
    }
}

/// Renders an amount with thousands separators, keeping at most two decimals
/// and only when they are non-zero. Extra decimals are truncated so a value
/// just under a threshold never prints as the threshold itself.
pub(crate) fn format_amount(value: f64) -> String {
    let cents = value.abs() * 100.0;
    let rounded = ((cents + 1e-6).trunc() / 100.0).copysign(value);
    let rendered = if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.2}").trim_end_matches('0').to_string()
    };

    let (sign, digits) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, ch) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}
