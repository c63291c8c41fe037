use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use super::{
    detect_category_anomaly, find_collaborator_match, CategoryAnomaly, DocumentCategory,
    MatchType, PageStatus,
};
use crate::collaborator::RosterEntry;

#[derive(Debug, Deserialize)]
pub(crate) struct MatchRequest {
    pub(crate) page_text: String,
    #[serde(default)]
    pub(crate) category: DocumentCategory,
    pub(crate) roster: Vec<RosterEntry>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MatchResponse {
    pub(crate) match_type: MatchType,
    pub(crate) matched: Option<RosterEntry>,
    pub(crate) detail: String,
    pub(crate) status: PageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) anomaly: Option<CategoryAnomaly>,
}

/// Stateless matching endpoint used by the import wizard's preview.
pub fn documents_router() -> Router {
    Router::new().route("/api/v1/documents/match", post(match_handler))
}

pub(crate) async fn match_handler(Json(request): Json<MatchRequest>) -> impl IntoResponse {
    let outcome = find_collaborator_match(&request.page_text, request.category, &request.roster);
    let anomaly = detect_category_anomaly(&request.page_text, request.category);
    let status = PageStatus::for_match(outcome.match_type, anomaly.as_ref());

    (
        StatusCode::OK,
        Json(MatchResponse {
            match_type: outcome.match_type,
            matched: outcome.matched,
            detail: outcome.detail,
            status,
            anomaly,
        }),
    )
}
