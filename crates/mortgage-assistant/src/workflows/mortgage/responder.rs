use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::warn;

use super::domain::{ApplicantProfile, ConversationState};
use super::eligibility::format_amount;
use crate::config::ResponderConfig;

const NOT_PROVIDED: &str = "Not provided yet";

/// Everything the free-text collaborator is told about the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponderContext {
    pub user_text: String,
    pub income: String,
    pub credit_score: String,
    pub loan_amount: String,
    pub property_value: String,
    pub state_label: &'static str,
}

impl ResponderContext {
    pub fn new(user_text: &str, profile: &ApplicantProfile, state: ConversationState) -> Self {
        let amount = |value: Option<f64>| {
            value
                .map(format_amount)
                .unwrap_or_else(|| NOT_PROVIDED.to_string())
        };

        Self {
            user_text: user_text.to_string(),
            income: amount(profile.income),
            credit_score: profile
                .credit_score
                .map(|score| score.to_string())
                .unwrap_or_else(|| NOT_PROVIDED.to_string()),
            loan_amount: amount(profile.loan_amount),
            property_value: amount(profile.property_value),
            state_label: state.label(),
        }
    }

    pub fn system_prompt(&self) -> String {
        format!(
            "You are an assistant helping users determine if they are eligible for a mortgage loan \
             based on the details they provided.\n\n\
             User provided the following details so far:\n\
             - Income: {}\n\
             - Credit Score: {}\n\
             - Loan Amount: {}\n\
             - Property Value: {}\n\n\
             Your task is to continue the conversation, ask the user for more details step by step, \
             and determine eligibility.\n\n\
             Next Step: {}",
            self.income, self.credit_score, self.loan_amount, self.property_value, self.state_label
        )
    }
}

/// Capability that answers input the conversation rules do not recognize.
#[async_trait]
pub trait FreeTextResponder: Send + Sync {
    async fn respond(&self, context: ResponderContext) -> Result<String, ResponderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ResponderError {
    #[error("free-text responder is not configured (set GROQ_API_KEY)")]
    NotConfigured,
    #[error("free-text responder unreachable: {0}")]
    Transport(String),
    #[error("free-text responder returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("free-text responder sent an unreadable reply: {0}")]
    MalformedReply(String),
}

/// Chat-completions client for Groq's OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct GroqResponder {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GroqResponder {
    pub fn from_config(config: &ResponderConfig) -> Result<Self, ResponderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ResponderError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub(crate) fn request_body(&self, context: &ResponderContext) -> Value {
        json!({
            "model": self.model,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": context.system_prompt() },
                { "role": "user", "content": context.user_text },
            ],
        })
    }
}

#[async_trait]
impl FreeTextResponder for GroqResponder {
    async fn respond(&self, context: ResponderContext) -> Result<String, ResponderError> {
        let api_key = self.api_key.as_deref().ok_or(ResponderError::NotConfigured)?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&self.request_body(&context))
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "free-text responder request failed");
                ResponderError::Transport(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "free-text responder rejected request");
            return Err(ResponderError::Status { status, body });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| ResponderError::MalformedReply(err.to_string()))?;

        completion_text(&payload)
    }
}

pub(crate) fn completion_text(payload: &Value) -> Result<String, ResponderError> {
    payload["choices"][0]["message"]["content"]
        .as_str()
        .map(|content| content.trim().to_string())
        .ok_or_else(|| ResponderError::MalformedReply("missing choices[0].message.content".into()))
}
