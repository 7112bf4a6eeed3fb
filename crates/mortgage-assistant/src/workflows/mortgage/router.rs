use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::SessionId;
use super::repository::SessionRepository;
use super::responder::FreeTextResponder;
use super::service::{ChatServiceError, MortgageChatService};

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct EligibilityRequest {
    pub income: f64,
    pub credit_score: u32,
    pub loan_amount: f64,
    pub property_value: f64,
}

/// Router builder exposing the conversation and a stateless eligibility check.
pub fn mortgage_router<R, F>(service: Arc<MortgageChatService<R, F>>) -> Router
where
    R: SessionRepository + 'static,
    F: FreeTextResponder + 'static,
{
    Router::new()
        .route("/api/v1/mortgage/sessions", post(create_handler::<R, F>))
        .route(
            "/api/v1/mortgage/sessions/:session_id",
            get(session_handler::<R, F>).delete(reset_handler::<R, F>),
        )
        .route(
            "/api/v1/mortgage/sessions/:session_id/messages",
            post(message_handler::<R, F>),
        )
        .route(
            "/api/v1/mortgage/eligibility",
            post(eligibility_handler::<R, F>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<R, F>(
    State(service): State<Arc<MortgageChatService<R, F>>>,
) -> Response
where
    R: SessionRepository + 'static,
    F: FreeTextResponder + 'static,
{
    let id = SessionId::generate();
    match service.open(&id) {
        Ok(session) => {
            let payload = json!({
                "session_id": session.session_id,
                "state": session.state,
                "greeting": service.greeting(),
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn message_handler<R, F>(
    State(service): State<Arc<MortgageChatService<R, F>>>,
    Path(session_id): Path<String>,
    Json(request): Json<MessageRequest>,
) -> Response
where
    R: SessionRepository + 'static,
    F: FreeTextResponder + 'static,
{
    let id = match SessionId::parse(&session_id) {
        Ok(id) => id,
        Err(err) => return unprocessable(err.to_string()),
    };

    match service.reply(&id, &request.text).await {
        Ok(turn) => (StatusCode::OK, Json(turn)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn session_handler<R, F>(
    State(service): State<Arc<MortgageChatService<R, F>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    F: FreeTextResponder + 'static,
{
    let id = match SessionId::parse(&session_id) {
        Ok(id) => id,
        Err(err) => return unprocessable(err.to_string()),
    };

    match service.session(&id) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reset_handler<R, F>(
    State(service): State<Arc<MortgageChatService<R, F>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    F: FreeTextResponder + 'static,
{
    let id = match SessionId::parse(&session_id) {
        Ok(id) => id,
        Err(err) => return unprocessable(err.to_string()),
    };

    match service.reset(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn eligibility_handler<R, F>(
    State(service): State<Arc<MortgageChatService<R, F>>>,
    Json(request): Json<EligibilityRequest>,
) -> Response
where
    R: SessionRepository + 'static,
    F: FreeTextResponder + 'static,
{
    let verdict = service.evaluator().evaluate_values(
        request.income,
        request.credit_score,
        request.loan_amount,
        request.property_value,
    );
    match verdict {
        Ok(verdict) => (StatusCode::OK, Json(verdict)).into_response(),
        Err(err) => unprocessable(err.to_string()),
    }
}

fn unprocessable(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
}

fn error_response(err: ChatServiceError) -> Response {
    let status = match err {
        ChatServiceError::EmptyMessage => StatusCode::UNPROCESSABLE_ENTITY,
        ChatServiceError::ResponderUnavailable(_) => StatusCode::BAD_GATEWAY,
        ChatServiceError::IncompleteProfile(_) | ChatServiceError::Repository(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
