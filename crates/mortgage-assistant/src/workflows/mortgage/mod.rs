//! Mortgage eligibility conversation: collects income, credit score, loan
//! amount and property value, then applies the lending rule and answers
//! follow-up questions about the verdict.

pub mod batch;
pub mod conversation;
pub mod domain;
pub mod eligibility;
pub mod repository;
pub mod responder;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use batch::{evaluate_csv, evaluate_csv_path, BatchError, BatchReport, BatchRow};
pub use conversation::{prompts, ControllerError, ConversationController, TurnReply};
pub use domain::{
    ApplicantProfile, CollectedValue, ConversationState, InvalidSessionId, ProfileField, Session,
    SessionId, Speaker, TranscriptEntry,
};
pub use eligibility::{
    check_amount, evaluate, Criterion, EligibilityEvaluator, EligibilityPolicy,
    EligibilityVerdict, IncompleteProfile, InvalidAmount,
};
pub use repository::{JsonFileSessionRepository, RepositoryError, SessionRepository};
pub use responder::{FreeTextResponder, GroqResponder, ResponderContext, ResponderError};
pub use router::mortgage_router;
pub use service::{ChatServiceError, MortgageChatService, SessionTurn, SessionView};
