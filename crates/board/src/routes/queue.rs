//! Queue status route.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use grid::sge::{Job, RunningJob};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Serialize)]
pub struct QueueStatusResponse {
    pub running_jobs: Vec<RunningJob>,
    pub jobs: Vec<JobRow>,
}

/// A known job plus whether a log file exists for it.
#[derive(Serialize)]
pub struct JobRow {
    #[serde(flatten)]
    pub job: Job,
    pub has_log: bool,
}

/// GET /api/queue — running jobs per queue plus all known jobs.
pub async fn queue_status(State(state): State<AppState>) -> ApiResult<Json<QueueStatusResponse>> {
    let status = state.sge.qstat().await?;

    let jobs = status
        .jobs
        .into_iter()
        .map(|job| JobRow {
            has_log: state.logs.has_log(job.number),
            job,
        })
        .collect();

    Ok(Json(QueueStatusResponse {
        running_jobs: status.running_jobs,
        jobs,
    }))
}
