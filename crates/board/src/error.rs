use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use grid::gpu::GpuError;
use grid::logview::LogStoreError;
use grid::sge::SgeError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No log recorded for job {0}")]
    LogNotFound(u64),

    #[error("Unknown job spec: {0}")]
    UnknownJobSpec(String),

    #[error("Required container images are missing: {0:?}")]
    MissingImages(Vec<String>),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Access PIN required")]
    Unauthorized,

    #[error("Help document not available")]
    HelpNotFound,

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SgeError),

    #[error("Engine error: {0}")]
    Engine(#[from] grid::engine::EngineError),

    #[error("GPU telemetry error: {0}")]
    Gpu(#[from] GpuError),

    #[error("Log store error: {0}")]
    LogStore(LogStoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

// Convenience type alias
pub type ApiResult<T> = Result<T, ApiError>;

impl From<LogStoreError> for ApiError {
    fn from(e: LogStoreError) -> Self {
        match e {
            LogStoreError::NotFound(job) => ApiError::LogNotFound(job),
            other => ApiError::LogStore(other),
        }
    }
}

impl IntoResponse for ApiError {
    /// Map to an HTTP status and a structured error body. Collaborator
    /// and internal detail is logged server-side and not exposed to the
    /// client.
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::LogNotFound(_) => {
                (StatusCode::NOT_FOUND, "LOG_NOT_FOUND", self.to_string())
            }
            ApiError::UnknownJobSpec(_) => {
                (StatusCode::BAD_REQUEST, "UNKNOWN_JOB_SPEC", self.to_string())
            }
            ApiError::MissingImages(_) => {
                (StatusCode::CONFLICT, "MISSING_IMAGES", self.to_string())
            }
            ApiError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", self.to_string())
            }
            ApiError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", self.to_string())
            }
            ApiError::HelpNotFound => {
                (StatusCode::NOT_FOUND, "HELP_NOT_FOUND", self.to_string())
            }
            ApiError::Scheduler(ref err) => {
                tracing::error!("Scheduler error: {}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    "SCHEDULER_ERROR",
                    "The batch scheduler could not be reached".to_string(),
                )
            }
            ApiError::Engine(ref err) => {
                tracing::error!("Engine error: {}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    "ENGINE_ERROR",
                    "The container engine could not be reached".to_string(),
                )
            }
            ApiError::Gpu(ref err) => {
                tracing::error!("GPU telemetry error: {}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    "GPU_ERROR",
                    "GPU telemetry could not be queried".to_string(),
                )
            }
            ApiError::LogStore(ref err) => {
                tracing::error!("Log store error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LOG_STORE_ERROR",
                    "The job log could not be read".to_string(),
                )
            }
            ApiError::Internal(ref detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}
