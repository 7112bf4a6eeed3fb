use serde::Serialize;
use tracing::{debug, info};

use super::prompts;
use super::transition::{transition, Command, Transition};
use crate::workflows::mortgage::domain::{ConversationState, Session, Speaker};
use crate::workflows::mortgage::eligibility::{
    EligibilityEvaluator, EligibilityVerdict, IncompleteProfile,
};
use crate::workflows::mortgage::responder::{FreeTextResponder, ResponderContext, ResponderError};

/// Assistant output for one turn, plus where the conversation now stands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnReply {
    pub reply: String,
    pub state: ConversationState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<EligibilityVerdict>,
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    IncompleteProfile(#[from] IncompleteProfile),
    #[error(transparent)]
    Responder(#[from] ResponderError),
}

/// Drives a [`Session`] through data collection and verdict follow-ups.
#[derive(Debug, Clone, Default)]
pub struct ConversationController {
    evaluator: EligibilityEvaluator,
}

impl ConversationController {
    pub fn new(evaluator: EligibilityEvaluator) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &EligibilityEvaluator {
        &self.evaluator
    }

    /// Applies one user input. The session is only updated when the whole
    /// turn succeeds; a failed responder call leaves it as it was.
    pub async fn handle_turn<F>(
        &self,
        session: &mut Session,
        input: &str,
        responder: &F,
    ) -> Result<TurnReply, ControllerError>
    where
        F: FreeTextResponder + ?Sized,
    {
        let mut working = session.clone();
        let reply = self.apply(&mut working, input, responder).await?;

        debug!(
            session_id = %working.session_id,
            from = session.state.label(),
            to = working.state.label(),
            "turn applied"
        );

        *session = working;
        Ok(reply)
    }

    /// Verdict for a session that has finished collection.
    pub fn verdict(&self, session: &Session) -> Result<EligibilityVerdict, IncompleteProfile> {
        self.evaluator.evaluate(&session.profile)
    }

    async fn apply<F>(
        &self,
        session: &mut Session,
        input: &str,
        responder: &F,
    ) -> Result<TurnReply, ControllerError>
    where
        F: FreeTextResponder + ?Sized,
    {
        let (reply, verdict) = match transition(session.state, input) {
            Transition::Collected { value, next } => {
                session.profile.record(value);
                session.state = next;

                if next == ConversationState::ReadyForEvaluation {
                    let verdict = self.verdict(session)?;
                    info!(
                        session_id = %session.session_id,
                        eligible = verdict.eligible,
                        failed = verdict.reasons.len(),
                        "eligibility evaluated"
                    );
                    let reply = format!(
                        "{} {}",
                        prompts::CHECKING_ELIGIBILITY,
                        announce(&verdict)
                    );
                    (reply, Some(verdict))
                } else {
                    (prompts::request_for(next).to_string(), None)
                }
            }
            Transition::Rejected(field) => (prompts::invalid_input(field), None),
            Transition::FollowUp(command) => {
                let verdict = self.verdict(session)?;
                (follow_up(command, &verdict), Some(verdict))
            }
            Transition::Delegate => {
                let context = ResponderContext::new(input, &session.profile, session.state);
                (responder.respond(context).await?, None)
            }
        };

        session.push(Speaker::User, input);
        session.push(Speaker::Assistant, reply.clone());

        Ok(TurnReply {
            reply,
            state: session.state,
            verdict,
        })
    }
}

fn announce(verdict: &EligibilityVerdict) -> String {
    if verdict.eligible {
        verdict.message.clone()
    } else {
        format!("{} {}", verdict.message, prompts::FOLLOW_UP_OFFER)
    }
}

/// Only "why" has an eligible answer; suggestions are listed either way.
fn follow_up(command: Command, verdict: &EligibilityVerdict) -> String {
    match command {
        Command::Explain if verdict.eligible => prompts::ALREADY_ELIGIBLE.to_string(),
        Command::Explain => format!("{}{}", prompts::REASONS_PREFIX, verdict.reasons.join("; ")),
        Command::Suggest => format!(
            "{}{}",
            prompts::SUGGESTIONS_PREFIX,
            verdict.suggestions.join("; ")
        ),
    }
}
