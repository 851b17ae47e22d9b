//! GPU telemetry route.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use grid::gpu::{GpuInfo, ProcessInfo};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Serialize)]
pub struct GpuReportResponse {
    pub driver_version: String,
    pub gpus: Vec<GpuInfo>,
    /// Collated process table across all GPUs, enriched with live
    /// process metadata where the pid still resolves.
    pub processes: Vec<GpuProcessRow>,
}

#[derive(Serialize)]
pub struct GpuProcessRow {
    pub gpu_id: String,
    pub pid: u32,
    pub process_name: String,
    pub used_memory_mib: Option<u64>,
    pub live: Option<ProcessInfo>,
}

/// GET /api/gpus — one telemetry snapshot with enriched process rows.
pub async fn gpu_report(State(state): State<AppState>) -> ApiResult<Json<GpuReportResponse>> {
    let report = state.gpu.query().await?;

    let mut processes = Vec::new();
    for gpu in &report.gpus {
        for process in &gpu.processes {
            processes.push(GpuProcessRow {
                gpu_id: gpu.id.clone(),
                pid: process.pid,
                process_name: process.process_name.clone(),
                used_memory_mib: process.used_memory_mib,
                live: state.processes.lookup(process.pid),
            });
        }
    }
    // Entries for processes that no longer show up age out here
    state.processes.evict_stale();

    Ok(Json(GpuReportResponse {
        driver_version: report.driver_version,
        gpus: report.gpus,
        processes,
    }))
}
