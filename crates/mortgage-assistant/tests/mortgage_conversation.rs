use std::sync::Arc;

use async_trait::async_trait;
use mortgage_assistant::workflows::mortgage::{
    prompts, ConversationState, EligibilityEvaluator, FreeTextResponder,
    JsonFileSessionRepository, MortgageChatService, ProfileField, ResponderContext,
    ResponderError, SessionId, Speaker,
};

struct EchoResponder;

#[async_trait]
impl FreeTextResponder for EchoResponder {
    async fn respond(&self, context: ResponderContext) -> Result<String, ResponderError> {
        Ok(format!("[{}] {}", context.state_label, context.user_text))
    }
}

fn service_for(
    dir: &std::path::Path,
) -> MortgageChatService<JsonFileSessionRepository, EchoResponder> {
    MortgageChatService::new(
        Arc::new(JsonFileSessionRepository::new(dir)),
        Arc::new(EchoResponder),
        EligibilityEvaluator::default(),
    )
}

#[tokio::test]
async fn conversation_resumes_from_snapshot_across_restarts() {
    let dir = tempfile::tempdir().expect("temp dir");
    let id = SessionId::parse("applicant-42").expect("valid id");

    {
        let service = service_for(dir.path());
        service.reply(&id, "20000").await.expect("income accepted");
        service.reply(&id, "600").await.expect("score accepted");
    }

    let service = service_for(dir.path());
    let resumed = service.open(&id).expect("snapshot loads");
    assert_eq!(resumed.state, ConversationState::AwaitingLoanAmount);
    assert_eq!(resumed.profile.credit_score, Some(600));
    assert_eq!(resumed.transcript.len(), 4);

    service.reply(&id, "280000").await.expect("loan accepted");
    let verdict_turn = service.reply(&id, "300000").await.expect("value accepted");
    assert_eq!(
        verdict_turn.turn.state,
        ConversationState::ReadyForEvaluation
    );
    assert!(verdict_turn.turn.reply.ends_with(prompts::FOLLOW_UP_OFFER));

    let why = service.reply(&id, "why?").await.expect("explanation");
    assert!(why.turn.reply.starts_with(prompts::REASONS_PREFIX));
    assert_eq!(why.turn.reply.matches("; ").count(), 2);

    let chat = service
        .reply(&id, "can I add a co-applicant?")
        .await
        .expect("delegated");
    assert_eq!(
        chat.turn.reply,
        "[ready_for_evaluation] can I add a co-applicant?"
    );

    let view = service.session(&id).expect("view builds");
    assert_eq!(view.transcript.len(), 12);
    assert_eq!(view.transcript[0].speaker, Speaker::User);
    assert_eq!(view.transcript[0].content, "20000");
}

#[tokio::test]
async fn corrupt_snapshot_starts_a_fresh_session() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("damaged.json"), b"\x00\x01 not a snapshot")
        .expect("write corrupt file");
    let id = SessionId::parse("damaged").expect("valid id");

    let service = service_for(dir.path());
    let session = service.open(&id).expect("open tolerates corruption");
    assert_eq!(session.state, ConversationState::AwaitingIncome);
    assert!(session.transcript.is_empty());

    let turn = service.reply(&id, "51000").await.expect("turn succeeds");
    assert_eq!(turn.turn.state, ConversationState::AwaitingCreditScore);
}

#[tokio::test]
async fn snapshot_with_mismatched_state_starts_a_fresh_session() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(
        dir.path().join("skipped.json"),
        r#"{"session_id":"skipped","profile":{"income":20000.0},"state":"ready_for_evaluation","transcript":[]}"#,
    )
    .expect("write snapshot");
    let id = SessionId::parse("skipped").expect("valid id");

    let service = service_for(dir.path());
    let view = service.session(&id).expect("view builds");
    assert_eq!(view.state, ConversationState::AwaitingIncome);
    assert!(view.verdict.is_none());

    let turn = service.reply(&id, "why?").await.expect("turn succeeds");
    assert_eq!(turn.turn.state, ConversationState::AwaitingIncome);
    assert_eq!(turn.turn.reply, prompts::invalid_input(ProfileField::Income));

    let turn = service.reply(&id, "50000").await.expect("income accepted");
    assert_eq!(turn.turn.state, ConversationState::AwaitingCreditScore);
}
