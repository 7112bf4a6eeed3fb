use super::common::*;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use axum::body::Body;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::mortgage::router::{message_handler, MessageRequest};
use crate::workflows::mortgage::{EligibilityEvaluator, MortgageChatService};

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request builds")
}

#[tokio::test]
async fn create_route_returns_greeting_and_id() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::post("/api/v1/mortgage/sessions")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert!(payload["session_id"].as_str().is_some());
    assert_eq!(payload["state"], "awaiting_income");
    assert!(payload["greeting"]
        .as_str()
        .expect("greeting text")
        .contains("Please enter your income"));
}

#[tokio::test]
async fn message_route_advances_the_conversation() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/mortgage/sessions/web-1/messages",
            json!({ "text": "45000" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["session_id"], "web-1");
    assert_eq!(payload["state"], "awaiting_credit_score");
    assert_eq!(
        payload["reply"],
        "Great! Now, could you please tell me your credit score?"
    );
    assert!(payload.get("verdict").is_none());
}

#[tokio::test]
async fn message_route_rejects_unsafe_session_ids() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/mortgage/sessions/..%2Fetc/messages",
            json!({ "text": "45000" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn message_handler_maps_responder_failures_to_bad_gateway() {
    let repository = Arc::new(MemoryRepository::default());
    let service = Arc::new(MortgageChatService::new(
        repository,
        Arc::new(OfflineResponder),
        EligibilityEvaluator::default(),
    ));
    let id = session_id("gateway");
    answer_all(service.as_ref(), &id, ["50000", "700", "200000", "300000"]).await;

    let response = message_handler(
        State(service),
        Path("gateway".to_string()),
        axum::Json(MessageRequest {
            text: "what documents do I need?".to_string(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error text")
        .contains("unreachable"));
}

#[tokio::test]
async fn session_route_returns_transcript_and_verdict() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);
    let id = session_id("viewer");
    answer_all(service.as_ref(), &id, ["20000", "700", "100000", "200000"]).await;

    let router = crate::workflows::mortgage::mortgage_router(service);
    let response = router
        .oneshot(
            Request::get("/api/v1/mortgage/sessions/viewer")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["state"], "ready_for_evaluation");
    assert_eq!(payload["transcript"].as_array().map(Vec::len), Some(8));
    assert_eq!(payload["transcript"][0]["speaker"], "user");
    assert_eq!(payload["verdict"]["eligible"], false);
    assert_eq!(payload["profile"]["credit_score"], 700);
}

#[tokio::test]
async fn delete_route_resets_session() {
    let (service, repository, _) = build_service();
    let service = Arc::new(service);
    let id = session_id("wipe");
    service.reply(&id, "45000").await.expect("turn succeeds");

    let router = crate::workflows::mortgage::mortgage_router(service);
    let response = router
        .oneshot(
            Request::delete("/api/v1/mortgage/sessions/wipe")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(repository.stored(&id).is_none());
}

#[tokio::test]
async fn eligibility_route_evaluates_without_a_session() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/mortgage/eligibility",
            json!({
                "income": 20000,
                "credit_score": 600,
                "loan_amount": 280000,
                "property_value": 300000
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["eligible"], false);
    assert_eq!(payload["reasons"].as_array().map(Vec::len), Some(3));
    assert_eq!(payload["suggestions"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn eligibility_route_rejects_negative_amounts() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/mortgage/eligibility",
            json!({
                "income": -5,
                "credit_score": 700,
                "loan_amount": 200000,
                "property_value": 300000
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .is_some_and(|message| message.starts_with("income must be")));
}
