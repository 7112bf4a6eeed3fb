use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier for a conversation; doubles as the snapshot key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    const MAX_LEN: usize = 64;

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Accepts ASCII letters, digits, `-` and `_` so ids are safe as file names.
    pub fn parse(raw: &str) -> Result<Self, InvalidSessionId> {
        let trimmed = raw.trim();
        let valid = !trimmed.is_empty()
            && trimmed.len() <= Self::MAX_LEN
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(InvalidSessionId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid session id '{0}': use 1-64 letters, digits, '-' or '_'")]
pub struct InvalidSessionId(pub String);

/// The four facts collected from the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Income,
    CreditScore,
    LoanAmount,
    PropertyValue,
}

impl ProfileField {
    pub fn label(&self) -> &'static str {
        match self {
            ProfileField::Income => "income",
            ProfileField::CreditScore => "credit score",
            ProfileField::LoanAmount => "loan amount",
            ProfileField::PropertyValue => "property value",
        }
    }
}

/// A parsed answer for one collection step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollectedValue {
    Income(f64),
    CreditScore(u32),
    LoanAmount(f64),
    PropertyValue(f64),
}

/// Accumulating record of applicant answers. Fields stay `None` until their
/// step completes and are never cleared within a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_value: Option<f64>,
}

impl ApplicantProfile {
    pub fn complete(income: f64, credit_score: u32, loan_amount: f64, property_value: f64) -> Self {
        Self {
            income: Some(income),
            credit_score: Some(credit_score),
            loan_amount: Some(loan_amount),
            property_value: Some(property_value),
        }
    }

    pub fn record(&mut self, value: CollectedValue) {
        match value {
            CollectedValue::Income(amount) => self.income = Some(amount),
            CollectedValue::CreditScore(score) => self.credit_score = Some(score),
            CollectedValue::LoanAmount(amount) => self.loan_amount = Some(amount),
            CollectedValue::PropertyValue(amount) => self.property_value = Some(amount),
        }
    }

    pub fn first_missing(&self) -> Option<ProfileField> {
        if self.income.is_none() {
            Some(ProfileField::Income)
        } else if self.credit_score.is_none() {
            Some(ProfileField::CreditScore)
        } else if self.loan_amount.is_none() {
            Some(ProfileField::LoanAmount)
        } else if self.property_value.is_none() {
            Some(ProfileField::PropertyValue)
        } else {
            None
        }
    }
}

/// Which datum the conversation is waiting for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    AwaitingIncome,
    AwaitingCreditScore,
    AwaitingLoanAmount,
    AwaitingPropertyValue,
    ReadyForEvaluation,
}

impl ConversationState {
    pub fn label(&self) -> &'static str {
        match self {
            ConversationState::AwaitingIncome => "awaiting_income",
            ConversationState::AwaitingCreditScore => "awaiting_credit_score",
            ConversationState::AwaitingLoanAmount => "awaiting_loan_amount",
            ConversationState::AwaitingPropertyValue => "awaiting_property_value",
            ConversationState::ReadyForEvaluation => "ready_for_evaluation",
        }
    }

    /// The field requested in this state, or `None` once collection is over.
    pub fn awaiting(&self) -> Option<ProfileField> {
        match self {
            ConversationState::AwaitingIncome => Some(ProfileField::Income),
            ConversationState::AwaitingCreditScore => Some(ProfileField::CreditScore),
            ConversationState::AwaitingLoanAmount => Some(ProfileField::LoanAmount),
            ConversationState::AwaitingPropertyValue => Some(ProfileField::PropertyValue),
            ConversationState::ReadyForEvaluation => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            ConversationState::AwaitingIncome => ConversationState::AwaitingCreditScore,
            ConversationState::AwaitingCreditScore => ConversationState::AwaitingLoanAmount,
            ConversationState::AwaitingLoanAmount => ConversationState::AwaitingPropertyValue,
            ConversationState::AwaitingPropertyValue | ConversationState::ReadyForEvaluation => {
                ConversationState::ReadyForEvaluation
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Assistant,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub content: String,
    pub recorded_at: DateTime<Utc>,
}

/// One applicant conversation: answers so far, active step, and transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: SessionId,
    #[serde(default)]
    pub profile: ApplicantProfile,
    #[serde(default)]
    pub state: ConversationState,
    #[serde(default)]
    pub transcript: Vec<TranscriptEntry>,
}

impl Session {
    pub fn fresh(session_id: SessionId) -> Self {
        Self {
            session_id,
            profile: ApplicantProfile::default(),
            state: ConversationState::AwaitingIncome,
            transcript: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, speaker: Speaker, content: impl Into<String>) {
        self.transcript.push(TranscriptEntry {
            speaker,
            content: content.into(),
            recorded_at: Utc::now(),
        });
    }
}
