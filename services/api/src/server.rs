use crate::cli::ServeArgs;
use crate::infra::{engine_config, AppState, InMemoryRunRepository, InMemorySensorFeed};
use crate::routes::with_induction_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use depot_ai::config::AppConfig;
use depot_ai::error::AppError;
use depot_ai::telemetry;
use depot_ai::workflows::induction::InductionPlanner;
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

    let repository = Arc::new(InMemoryRunRepository::default());
    let sensors = Arc::new(InMemorySensorFeed::default());
    let planner = Arc::new(InductionPlanner::new(
        repository,
        sensors,
        engine_config(&config.engine),
    ));

    let app = with_induction_routes(planner)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "induction planner ready");

    axum::serve(listener, app).await?;
    Ok(())
}
