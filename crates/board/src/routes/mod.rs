//! HTTP routes.
//!
//! One module per resource; `build_router` assembles the full service.
//! Every `/api` route sits behind the PIN gate; root and health do not.

pub mod gpu;
pub mod help;
pub mod images;
pub mod jobs;
pub mod logs;
pub mod queue;

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Json};
use axum::routing::{delete, get, post};
use axum::{middleware, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::state::AppState;

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    // CORS configuration
    let cors = if state.config.server.enable_cors {
        let origins = state
            .config
            .server
            .cors_origins
            .iter()
            .filter_map(|s| s.parse::<axum::http::HeaderValue>().ok())
            .collect::<Vec<_>>();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([
                header::CONTENT_TYPE,
                header::HeaderName::from_static(auth::PIN_HEADER),
            ])
    } else {
        // When CORS is disabled, use a restrictive layer (same-origin only)
        CorsLayer::new()
    };

    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    let api = Router::new()
        .route("/queue", get(queue::queue_status))
        .route("/jobs", post(jobs::submit_job))
        .route("/jobs/{number}", delete(jobs::delete_job))
        .route("/jobs/{number}/log", get(logs::job_log))
        .route("/jobs/{number}/log/raw", get(logs::job_log_raw))
        .route("/jobspecs", get(jobs::list_job_specs))
        .route(
            "/images",
            get(images::list_images).delete(images::delete_images),
        )
        .route("/images/build", post(images::build_images))
        .route("/gpus", get(gpu::gpu_report))
        .route("/help", get(help::help_document))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_pin,
        ));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // Timeout for requests (prevents indefinitely hanging connections)
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    request_timeout,
                ))
                // Submission bodies are small; anything larger is abuse
                .layer(DefaultBodyLimit::max(64 * 1024))
                .layer(cors),
        )
        .with_state(state)
}

/// Root handler - shows API info
async fn root_handler() -> Json<serde_json::Value> {
    Json(json!({
        "name": "Gridboard API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "queue": "/api/queue",
            "jobs": "/api/jobs",
            "jobspecs": "/api/jobspecs",
            "images": "/api/images",
            "gpus": "/api/gpus",
            "help": "/api/help",
            "health": "/health"
        }
    }))
}

/// Health check handler. The collaborators are reached lazily per
/// request, so liveness is all this reports.
async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
