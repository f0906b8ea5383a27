use crate::cli::ServeArgs;
use crate::infra::{sample_cases, AppState, InMemoryCaseGateway};
use crate::routes::with_case_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use casebook::config::AppConfig;
use casebook::error::AppError;
use casebook::telemetry;
use casebook::workflows::case::CaseWorkflowService;
use chrono::Utc;
use std::sync::atomic::Ordering;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let gateway = Arc::new(InMemoryCaseGateway::with_cases(sample_cases(Utc::now())));
    let case_service = Arc::new(CaseWorkflowService::new(gateway));

    let app = with_case_routes(case_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        highlight_ms = config.workflow.highlight_ms,
        "casebook service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
