//! Job log routes — structured document and raw download.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use grid::logview::LogDocument;

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/jobs/{number}/log — the sectioned view of a job's log.
pub async fn job_log(
    State(state): State<AppState>,
    Path(number): Path<u64>,
) -> ApiResult<Json<LogDocument>> {
    let document = state.logs.read_document(number).await?;
    Ok(Json(document))
}

/// GET /api/jobs/{number}/log/raw — the verbatim log text, unmodified,
/// for diagnostic download.
pub async fn job_log_raw(
    State(state): State<AppState>,
    Path(number): Path<u64>,
) -> ApiResult<impl IntoResponse> {
    let raw = state.logs.read_raw(number).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        raw,
    ))
}
