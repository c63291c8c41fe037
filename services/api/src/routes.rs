use crate::infra::AppState;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use qualybuss::calendar::HolidaySource;
use qualybuss::collaborator::CollaboratorRecord;
use qualybuss::documents::documents_router;
use qualybuss::error::AppError;
use qualybuss::export::collaborators_csv;
use qualybuss::leave::{leave_router, LeaveRepository, LeaveService};
use serde_json::json;
use std::sync::Arc;

const EXPORT_FILE_NAME: &str = "colaboradores.csv";

pub(crate) fn with_domain_routes<R, S>(service: Arc<LeaveService<R, S>>) -> axum::Router
where
    R: LeaveRepository + 'static,
    S: HolidaySource + 'static,
{
    leave_router(service)
        .merge(documents_router())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/collaborators/export.csv",
            axum::routing::post(collaborators_export_endpoint),
        )
        .route(
            "/api/v1/postal-codes/:cep",
            axum::routing::get(postal_code_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn collaborators_export_endpoint(
    Json(records): Json<Vec<CollaboratorRecord>>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = collaborators_csv(&records)?;
    let content_type = mime_guess::from_path(EXPORT_FILE_NAME)
        .first_or_octet_stream()
        .to_string();
    tracing::info!(rows = records.len(), "collaborator export generated");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format!("{content_type}; charset=utf-8")),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        bytes,
    ))
}

pub(crate) async fn postal_code_endpoint(
    Extension(state): Extension<AppState>,
    Path(cep): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let address = state.postal.lookup(&cep).await?;
    Ok(Json(address))
}
