//! Container image routes — list, build, delete.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::info;

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/images — all images on the host.
pub async fn list_images(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let images = state.engine.list_images().await?;
    Ok(Json(json!({
        "total": images.len(),
        "images": images,
    })))
}

/// POST /api/images/build — submit the image build job to the
/// scheduler. Returns 202 with the assigned job number; progress shows
/// up in the queue like any other job.
pub async fn build_images(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let engine_cfg = &state.config.engine;
    let job_env = BTreeMap::from([
        ("CONTAINER_DIR".to_string(), engine_cfg.container_dir.clone()),
        ("LABEL_NS".to_string(), engine_cfg.label_ns.clone()),
        ("APP_PREFIX".to_string(), engine_cfg.app_prefix.clone()),
    ]);

    let submitted = state
        .sge
        .submit(&engine_cfg.build_script, "Build container images", &job_env)
        .await?;
    info!(job = submitted.number, "image build job submitted");

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "number": submitted.number,
            "name": submitted.name,
        })),
    ))
}

/// DELETE /api/images — remove every tracked image.
pub async fn delete_images(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let removed = state.engine.delete_images().await?;
    Ok(Json(json!({
        "status": "deleted",
        "removed": removed,
    })))
}
