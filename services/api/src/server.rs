use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySessionRepository};
use crate::routes::with_mortgage_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mortgage_assistant::config::AppConfig;
use mortgage_assistant::error::AppError;
use mortgage_assistant::telemetry;
use mortgage_assistant::workflows::mortgage::{
    EligibilityEvaluator, GroqResponder, JsonFileSessionRepository, MortgageChatService,
    SessionRepository,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if args.ephemeral {
        info!("session snapshots kept in memory only");
        serve(config, Arc::new(InMemorySessionRepository::default())).await
    } else {
        info!(dir = %config.sessions.snapshot_dir.display(), "session snapshots on disk");
        let repository = JsonFileSessionRepository::new(config.sessions.snapshot_dir.clone());
        serve(config, Arc::new(repository)).await
    }
}

async fn serve<R>(config: AppConfig, repository: Arc<R>) -> Result<(), AppError>
where
    R: SessionRepository + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    if config.responder.api_key.is_none() {
        info!("GROQ_API_KEY not set; free-text questions will fail with 502");
    }
    let responder = Arc::new(GroqResponder::from_config(&config.responder)?);
    let service = Arc::new(MortgageChatService::new(
        repository,
        responder,
        EligibilityEvaluator::new(config.policy.clone()),
    ));

    let app = with_mortgage_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "mortgage assistant ready");

    axum::serve(listener, app).await?;
    Ok(())
}
