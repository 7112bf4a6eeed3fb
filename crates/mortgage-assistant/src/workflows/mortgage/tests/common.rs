use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::mortgage::domain::{ApplicantProfile, Session, SessionId};
use crate::workflows::mortgage::repository::{RepositoryError, SessionRepository};
use crate::workflows::mortgage::responder::{
    FreeTextResponder, ResponderContext, ResponderError,
};
use crate::workflows::mortgage::{mortgage_router, EligibilityEvaluator, MortgageChatService};

pub(super) const CANNED_REPLY: &str = "Rates depend on the lender; I can only check eligibility.";

pub(super) fn eligible_profile() -> ApplicantProfile {
    ApplicantProfile::complete(50_000.0, 700, 200_000.0, 300_000.0)
}

pub(super) fn ineligible_profile() -> ApplicantProfile {
    ApplicantProfile::complete(20_000.0, 600, 280_000.0, 300_000.0)
}

pub(super) fn session_id(raw: &str) -> SessionId {
    SessionId::parse(raw).expect("valid session id")
}

/// Deterministic responder that records every context it is given.
#[derive(Default)]
pub(super) struct ScriptedResponder {
    contexts: Mutex<Vec<ResponderContext>>,
}

impl ScriptedResponder {
    pub(super) fn contexts(&self) -> Vec<ResponderContext> {
        self.contexts.lock().expect("responder mutex poisoned").clone()
    }
}

#[async_trait]
impl FreeTextResponder for ScriptedResponder {
    async fn respond(&self, context: ResponderContext) -> Result<String, ResponderError> {
        self.contexts
            .lock()
            .expect("responder mutex poisoned")
            .push(context);
        Ok(CANNED_REPLY.to_string())
    }
}

pub(super) struct OfflineResponder;

#[async_trait]
impl FreeTextResponder for OfflineResponder {
    async fn respond(&self, _context: ResponderContext) -> Result<String, ResponderError> {
        Err(ResponderError::Transport("connection refused".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) sessions: Arc<Mutex<HashMap<SessionId, Session>>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self, id: &SessionId) -> Option<Session> {
        self.sessions
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
    }
}

impl SessionRepository for MemoryRepository {
    fn load(&self, id: &SessionId) -> Result<Option<Session>, RepositoryError> {
        Ok(self.stored(id))
    }

    fn save(&self, session: &Session) -> Result<(), RepositoryError> {
        self.sessions
            .lock()
            .expect("repository mutex poisoned")
            .insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    fn delete(&self, id: &SessionId) -> Result<(), RepositoryError> {
        self.sessions
            .lock()
            .expect("repository mutex poisoned")
            .remove(id);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn load(&self, _id: &SessionId) -> Result<Option<Session>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn save(&self, _session: &Session) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn delete(&self, _id: &SessionId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    MortgageChatService<MemoryRepository, ScriptedResponder>,
    Arc<MemoryRepository>,
    Arc<ScriptedResponder>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let responder = Arc::new(ScriptedResponder::default());
    let service = MortgageChatService::new(
        repository.clone(),
        responder.clone(),
        EligibilityEvaluator::default(),
    );
    (service, repository, responder)
}

pub(super) async fn answer_all<R, F>(
    service: &MortgageChatService<R, F>,
    id: &SessionId,
    answers: [&str; 4],
) where
    R: SessionRepository + 'static,
    F: FreeTextResponder + 'static,
{
    for answer in answers {
        service.reply(id, answer).await.expect("answer accepted");
    }
}

pub(super) fn router_with_service(
    service: MortgageChatService<MemoryRepository, ScriptedResponder>,
) -> axum::Router {
    mortgage_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
