use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::warn;

use super::conversation::{prompts, ControllerError, ConversationController, TurnReply};
use super::domain::{
    ApplicantProfile, ConversationState, ProfileField, Session, SessionId, TranscriptEntry,
};
use super::eligibility::{
    check_amount, EligibilityEvaluator, EligibilityVerdict, IncompleteProfile,
};
use super::repository::{RepositoryError, SessionRepository};
use super::responder::{FreeTextResponder, ResponderError};

/// Service composing snapshot storage, the conversation controller, and the
/// free-text responder.
pub struct MortgageChatService<R, F> {
    repository: Arc<R>,
    responder: Arc<F>,
    controller: ConversationController,
    turns: Mutex<()>,
}

/// Reply for one turn, tagged with the session it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionTurn {
    pub session_id: SessionId,
    #[serde(flatten)]
    pub turn: TurnReply,
}

/// Read model of a session for rendering surfaces.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub state: ConversationState,
    pub profile: ApplicantProfile,
    pub transcript: Vec<TranscriptEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<EligibilityVerdict>,
}

impl<R, F> MortgageChatService<R, F>
where
    R: SessionRepository + 'static,
    F: FreeTextResponder + 'static,
{
    pub fn new(repository: Arc<R>, responder: Arc<F>, evaluator: EligibilityEvaluator) -> Self {
        Self {
            repository,
            responder,
            controller: ConversationController::new(evaluator),
            turns: Mutex::new(()),
        }
    }

    pub fn greeting(&self) -> &'static str {
        prompts::GREETING
    }

    pub fn evaluator(&self) -> &EligibilityEvaluator {
        self.controller.evaluator()
    }

    /// Stored session for `id`, or a fresh one if none was saved or the
    /// snapshot cannot be resumed.
    pub fn open(&self, id: &SessionId) -> Result<Session, ChatServiceError> {
        let stored = self.repository.load(id)?;
        Ok(resume(id, stored))
    }

    /// Apply one user message and persist the resulting snapshot.
    pub async fn reply(&self, id: &SessionId, text: &str) -> Result<SessionTurn, ChatServiceError> {
        if text.trim().is_empty() {
            return Err(ChatServiceError::EmptyMessage);
        }

        let _turn = self.turns.lock().await;
        let key = id.clone();
        let stored = self.blocking(move |repository| repository.load(&key)).await?;
        let mut session = resume(id, stored);

        let turn = self
            .controller
            .handle_turn(&mut session, text, self.responder.as_ref())
            .await
            .map_err(|err| {
                warn!(session_id = %id, error = %err, "turn failed");
                ChatServiceError::from(err)
            })?;

        self.blocking(move |repository| repository.save(&session)).await?;

        Ok(SessionTurn {
            session_id: id.clone(),
            turn,
        })
    }

    pub fn session(&self, id: &SessionId) -> Result<SessionView, ChatServiceError> {
        let session = self.open(id)?;
        let verdict = match session.state {
            ConversationState::ReadyForEvaluation => Some(self.controller.verdict(&session)?),
            _ => None,
        };

        Ok(SessionView {
            session_id: session.session_id,
            state: session.state,
            profile: session.profile,
            transcript: session.transcript,
            verdict,
        })
    }

    /// Forget a session; its next turn starts from the income question.
    pub fn reset(&self, id: &SessionId) -> Result<(), ChatServiceError> {
        self.repository.delete(id)?;
        Ok(())
    }

    /// Runs snapshot I/O on the blocking pool so file-backed repositories do
    /// not stall the runtime while a turn holds the lock.
    async fn blocking<T, Op>(&self, op: Op) -> Result<T, ChatServiceError>
    where
        T: Send + 'static,
        Op: FnOnce(&R) -> Result<T, RepositoryError> + Send + 'static,
    {
        let repository = Arc::clone(&self.repository);
        let outcome = tokio::task::spawn_blocking(move || op(repository.as_ref()))
            .await
            .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;
        Ok(outcome?)
    }
}

/// A snapshot is only resumed when its state is the step its profile
/// actually reached; anything else restarts the conversation.
fn resume(id: &SessionId, stored: Option<Session>) -> Session {
    match stored {
        Some(session) if is_consistent(&session) => session,
        Some(session) => {
            warn!(
                session_id = %id,
                state = session.state.label(),
                "snapshot state does not match its profile; starting fresh"
            );
            Session::fresh(id.clone())
        }
        None => Session::fresh(id.clone()),
    }
}

fn is_consistent(session: &Session) -> bool {
    let profile = &session.profile;
    let amounts = [
        (ProfileField::Income, profile.income),
        (ProfileField::LoanAmount, profile.loan_amount),
        (ProfileField::PropertyValue, profile.property_value),
    ];
    let amounts_valid = amounts.into_iter().all(|(field, value)| {
        value.map_or(true, |amount| check_amount(field, amount).is_ok())
    });

    amounts_valid && session.state.awaiting() == profile.first_missing()
}

/// Error raised by the chat service.
#[derive(Debug, thiserror::Error)]
pub enum ChatServiceError {
    #[error("message text must not be empty")]
    EmptyMessage,
    #[error(transparent)]
    IncompleteProfile(#[from] IncompleteProfile),
    #[error(transparent)]
    ResponderUnavailable(#[from] ResponderError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ControllerError> for ChatServiceError {
    fn from(value: ControllerError) -> Self {
        match value {
            ControllerError::IncompleteProfile(err) => Self::IncompleteProfile(err),
            ControllerError::Responder(err) => Self::ResponderUnavailable(err),
        }
    }
}
