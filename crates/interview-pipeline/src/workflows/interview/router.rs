use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Deserializer};
use serde_json::json;

use super::board::{PipelineBoard, PipelineError, RefreshOutcome};
use super::domain::{Application, ApplicationId, Job};
use super::source::ApplicationSource;
use super::view::build_rows;

/// Navigation parameters for the board listing.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct BoardQuery {
    /// Set by a referring page to emphasise freshly shortlisted candidates.
    #[serde(default, deserialize_with = "query_flag")]
    pub(crate) highlight: bool,
    /// Session that owns the highlight window across polls.
    #[serde(default)]
    pub(crate) viewer: Option<String>,
}

/// `true`, `1`, `yes`, `on` and a bare `?highlight` count as set; anything else does not.
fn query_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "" | "1" | "true" | "yes" | "on"
    ))
}

/// Stateless derivation input: applications plus the job they were made to.
#[derive(Debug, Deserialize)]
pub(crate) struct DeriveRequest {
    #[serde(default)]
    pub(crate) job: Option<Job>,
    pub(crate) applications: Vec<Application>,
    #[serde(default)]
    pub(crate) highlight: bool,
}

/// Router exposing the pipeline board.
pub fn pipeline_router<S>(board: Arc<PipelineBoard<S>>) -> Router
where
    S: ApplicationSource + 'static,
{
    Router::new()
        .route("/api/v1/pipeline/applications", get(board_handler::<S>))
        .route(
            "/api/v1/pipeline/applications/:application_id/rounds/:round",
            get(round_detail_handler::<S>),
        )
        .route("/api/v1/pipeline/refresh", post(refresh_handler::<S>))
        .route("/api/v1/pipeline/derive", post(derive_handler))
        .with_state(board)
}

pub(crate) async fn board_handler<S>(
    State(board): State<Arc<PipelineBoard<S>>>,
    Query(query): Query<BoardQuery>,
) -> Response
where
    S: ApplicationSource + 'static,
{
    let highlight_active = board.highlight_for(query.viewer.as_deref(), query.highlight);
    (StatusCode::OK, Json(board.view(highlight_active).await)).into_response()
}

pub(crate) async fn refresh_handler<S>(State(board): State<Arc<PipelineBoard<S>>>) -> Response
where
    S: ApplicationSource + 'static,
{
    match board.refresh().await {
        Ok(outcome @ RefreshOutcome::Refreshed { .. }) => {
            (StatusCode::OK, Json(outcome)).into_response()
        }
        Ok(outcome @ RefreshOutcome::Skipped) => {
            (StatusCode::CONFLICT, Json(outcome)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn round_detail_handler<S>(
    State(board): State<Arc<PipelineBoard<S>>>,
    Path((application_id, round)): Path<(String, String)>,
) -> Response
where
    S: ApplicationSource + 'static,
{
    let id = ApplicationId(application_id);
    match board.round_detail(&id, &round).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn derive_handler(Json(request): Json<DeriveRequest>) -> Response {
    let DeriveRequest {
        job,
        applications,
        highlight,
    } = request;

    let rows = build_rows(&applications, job.as_ref(), highlight);
    (StatusCode::OK, Json(json!({ "applications": rows }))).into_response()
}

fn error_response(err: PipelineError) -> Response {
    let status = match &err {
        PipelineError::ApplicationNotFound(_) => StatusCode::NOT_FOUND,
        PipelineError::Source(_) => StatusCode::BAD_GATEWAY,
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
