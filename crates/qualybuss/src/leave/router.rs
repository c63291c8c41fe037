use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{LeaveRequestId, LeaveSubmission};
use super::repository::{LeaveRepository, RepositoryError};
use super::service::{LeaveError, LeaveService};
use crate::calendar::HolidaySource;

/// Router builder exposing leave intake, decisions and the start-date check.
pub fn leave_router<R, S>(service: Arc<LeaveService<R, S>>) -> Router
where
    R: LeaveRepository + 'static,
    S: HolidaySource + 'static,
{
    Router::new()
        .route(
            "/api/v1/leave",
            post(submit_handler::<R, S>).get(list_handler::<R, S>),
        )
        .route("/api/v1/leave/start-check", post(start_check_handler::<R, S>))
        .route("/api/v1/leave/:leave_id", get(get_handler::<R, S>))
        .route(
            "/api/v1/leave/:leave_id/approve",
            put(approve_handler::<R, S>),
        )
        .route("/api/v1/leave/:leave_id/reject", put(reject_handler::<R, S>))
        .route("/api/v1/leave/:leave_id/cancel", put(cancel_handler::<R, S>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct StartCheckRequest {
    pub(crate) date: NaiveDate,
}

pub(crate) async fn submit_handler<R, S>(
    State(service): State<Arc<LeaveService<R, S>>>,
    Json(submission): Json<LeaveSubmission>,
) -> Response
where
    R: LeaveRepository + 'static,
    S: HolidaySource + 'static,
{
    match service.submit(submission, Utc::now()).await {
        Ok(request) => (StatusCode::CREATED, Json(request)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R, S>(State(service): State<Arc<LeaveService<R, S>>>) -> Response
where
    R: LeaveRepository + 'static,
    S: HolidaySource + 'static,
{
    match service.visible(Utc::now()) {
        Ok(requests) => (StatusCode::OK, Json(requests)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R, S>(
    State(service): State<Arc<LeaveService<R, S>>>,
    Path(leave_id): Path<String>,
) -> Response
where
    R: LeaveRepository + 'static,
    S: HolidaySource + 'static,
{
    match service.get(&LeaveRequestId(leave_id)) {
        Ok(request) => (StatusCode::OK, Json(request)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn approve_handler<R, S>(
    State(service): State<Arc<LeaveService<R, S>>>,
    Path(leave_id): Path<String>,
) -> Response
where
    R: LeaveRepository + 'static,
    S: HolidaySource + 'static,
{
    decision_response(service.approve(&LeaveRequestId(leave_id), Utc::now()))
}

pub(crate) async fn reject_handler<R, S>(
    State(service): State<Arc<LeaveService<R, S>>>,
    Path(leave_id): Path<String>,
) -> Response
where
    R: LeaveRepository + 'static,
    S: HolidaySource + 'static,
{
    decision_response(service.reject(&LeaveRequestId(leave_id), Utc::now()))
}

pub(crate) async fn cancel_handler<R, S>(
    State(service): State<Arc<LeaveService<R, S>>>,
    Path(leave_id): Path<String>,
) -> Response
where
    R: LeaveRepository + 'static,
    S: HolidaySource + 'static,
{
    decision_response(service.cancel(&LeaveRequestId(leave_id), Utc::now()))
}

pub(crate) async fn start_check_handler<R, S>(
    State(service): State<Arc<LeaveService<R, S>>>,
    Json(request): Json<StartCheckRequest>,
) -> Response
where
    R: LeaveRepository + 'static,
    S: HolidaySource + 'static,
{
    match service.calendar().check_start(request.date).await {
        Ok(check) => (StatusCode::OK, Json(check)).into_response(),
        Err(error) => error_response(LeaveError::Calendar(error)),
    }
}

fn decision_response(result: Result<super::LeaveRequest, LeaveError>) -> Response {
    match result {
        Ok(request) => (StatusCode::OK, Json(request)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: LeaveError) -> Response {
    let status = match &error {
        LeaveError::InvalidPeriod { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        LeaveError::BlockedStart { reasons, .. } => {
            let payload = json!({
                "error": error.to_string(),
                "reasons": reasons.iter().map(ToString::to_string).collect::<Vec<_>>(),
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
        LeaveError::IllegalTransition { .. } => StatusCode::CONFLICT,
        LeaveError::NotFound(_) | LeaveError::Repository(RepositoryError::NotFound) => {
            StatusCode::NOT_FOUND
        }
        LeaveError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        LeaveError::Calendar(_) => {
            tracing::error!(error = %error, "holiday calendar unavailable");
            StatusCode::BAD_GATEWAY
        }
        LeaveError::Repository(RepositoryError::Unavailable(_)) => {
            tracing::error!(error = %error, "leave repository unavailable");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(json!({ "error": error.to_string() }))).into_response()
}
