use metrics_exporter_prometheus::PrometheusHandle;
use mortgage_assistant::workflows::mortgage::{
    RepositoryError, Session, SessionId, SessionRepository,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session storage for `serve --ephemeral`.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<SessionId, Session>>>,
}

impl InMemorySessionRepository {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, Session>>, RepositoryError> {
        self.sessions
            .lock()
            .map_err(|_| RepositoryError::Unavailable("session store mutex poisoned".to_string()))
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn load(&self, id: &SessionId) -> Result<Option<Session>, RepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn save(&self, session: &Session) -> Result<(), RepositoryError> {
        self.lock()?.insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    fn delete(&self, id: &SessionId) -> Result<(), RepositoryError> {
        self.lock()?.remove(id);
        Ok(())
    }
}
