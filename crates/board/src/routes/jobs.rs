//! Job submission and deletion routes.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use grid::engine::JobSpec;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// Job-spec id; the first configured spec when omitted.
    pub job_spec_id: Option<String>,
    pub git_repo: String,
    #[serde(default)]
    pub git_branch: String,
}

/// POST /api/jobs — submit a job for the requested spec.
///
/// Refused while any spec's image is missing; the images must be built
/// first so a submission never sits in the queue waiting for a
/// container that does not exist.
pub async fn submit_job(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.git_repo.trim().is_empty() {
        return Err(ApiError::InvalidRequest("git_repo must not be empty".into()));
    }

    let specs = &state.config.job_specs;
    let missing = state.engine.missing_images(specs).await?;
    if !missing.is_empty() {
        return Err(ApiError::MissingImages(
            missing.into_iter().map(|s| s.image_subtype).collect(),
        ));
    }

    let spec = match &req.job_spec_id {
        Some(id) => {
            JobSpec::lookup(specs, id).ok_or_else(|| ApiError::UnknownJobSpec(id.clone()))?
        }
        None => specs
            .first()
            .ok_or_else(|| ApiError::Internal("no job specs configured".into()))?,
    };

    let image = state
        .engine
        .image_for_subtype(&spec.image_subtype)
        .await?
        .ok_or_else(|| ApiError::MissingImages(vec![spec.image_subtype.clone()]))?;

    let name = format!("{} job from {}", spec.description, req.git_repo);
    let job_env = BTreeMap::from([
        ("GIT_REPO".to_string(), req.git_repo.clone()),
        ("GIT_BRANCH".to_string(), req.git_branch.clone()),
        ("CONTAINER_TAG".to_string(), image.id.clone()),
    ]);

    let submitted = state.sge.submit(&spec.job_script, &name, &job_env).await?;
    info!(job = submitted.number, spec = %spec.id, "job submitted");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "number": submitted.number,
            "name": submitted.name,
        })),
    ))
}

/// DELETE /api/jobs/{number} — remove a job from the scheduler queue.
pub async fn delete_job(
    State(state): State<AppState>,
    Path(number): Path<u64>,
) -> ApiResult<Json<serde_json::Value>> {
    state.sge.delete(number).await?;
    Ok(Json(json!({
        "status": "deleted",
        "number": number,
    })))
}

/// GET /api/jobspecs — the catalog plus any specs whose image is
/// missing.
pub async fn list_job_specs(
    State(state): State<AppState>,
) -> ApiResult<Json<serde_json::Value>> {
    let specs = &state.config.job_specs;
    let missing = state.engine.missing_images(specs).await?;

    Ok(Json(json!({
        "job_specs": specs,
        "missing_images": missing.iter().map(|s| s.image_subtype.as_str()).collect::<Vec<_>>(),
    })))
}
