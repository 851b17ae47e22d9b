//! Help route — serves the usage document.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/help — the usage document as markdown. Rendering is the
/// frontend's concern.
pub async fn help_document(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let content = tokio::fs::read_to_string(&state.config.server.help_path)
        .await
        .map_err(|_| ApiError::HelpNotFound)?;

    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        content,
    ))
}
