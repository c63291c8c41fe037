use crate::cli::ServeArgs;
use crate::infra::{holiday_calendar, AppState, InMemoryLeaveRepository};
use crate::routes::with_domain_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use qualybuss::calendar::postal::PostalCodeClient;
use qualybuss::config::AppConfig;
use qualybuss::error::AppError;
use qualybuss::leave::LeaveService;
use qualybuss::telemetry;
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
        postal: Arc::new(PostalCodeClient::new(config.calendar.postal_api_url.clone())?),
    };

    let repository = Arc::new(InMemoryLeaveRepository::default());
    let calendar = Arc::new(holiday_calendar(&config.calendar)?);
    let leave_service = Arc::new(LeaveService::new(repository, calendar, &config.leave));

    let app = with_domain_routes(leave_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        rest_day = %config.calendar.rest_day,
        "qualybuss back office ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
