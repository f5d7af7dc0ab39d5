use crate::cli::ServeArgs;
use crate::demo::{demo_applications, demo_assessments};
use crate::infra::{AppState, ConfiguredSource, InMemoryApplicationSource};
use crate::routes::with_pipeline_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use interview_pipeline::config::AppConfig;
use interview_pipeline::error::AppError;
use interview_pipeline::telemetry;
use interview_pipeline::workflows::interview::{PipelineBoard, RestApplicationSource};
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

    let source = match config.pipeline.upstream_url.as_deref() {
        Some(url) => {
            info!(upstream = url, "reading applications from upstream backend");
            ConfiguredSource::Rest(RestApplicationSource::new(
                url,
                config.pipeline.request_timeout,
            )?)
        }
        None => {
            info!("no upstream configured; serving demo applications");
            ConfiguredSource::InMemory(InMemoryApplicationSource::new(
                demo_applications(),
                demo_assessments(),
            ))
        }
    };

    let board = Arc::new(PipelineBoard::new(Arc::new(source), &config.pipeline));
    let _polling = board.spawn_polling();

    let app = with_pipeline_routes(board)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        refresh_secs = config.pipeline.refresh_interval.as_secs(),
        "interview pipeline board ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
