use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use grid::engine::EngineClient;
use grid::gpu::{GpuClient, ProcessCache};
use grid::logview::LogStore;
use grid::sge::SgeClient;

use crate::config::BoardConfig;

/// Shared application state handed to every handler. Cheap to clone;
/// the collaborator clients are either stateless or internally shared.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BoardConfig>,
    pub sge: SgeClient,
    pub engine: EngineClient,
    pub gpu: GpuClient,
    pub logs: LogStore,
    pub processes: Arc<ProcessCache>,
}

impl AppState {
    pub fn new(config: BoardConfig) -> Result<Self> {
        let sge = SgeClient::new(
            config.scheduler.qstat_bin.clone(),
            config.scheduler.qsub_bin.clone(),
            config.scheduler.qdel_bin.clone(),
            &config.scheduler.script_dir,
        );

        let engine = EngineClient::new(&config.engine.docker_socket, &config.engine.label_ns)
            .context("Failed to create container engine client")?;

        let gpu = GpuClient::new(config.gpu.smi_bin.clone());
        let logs = LogStore::new(&config.job_logs.dir);
        let processes = Arc::new(ProcessCache::new(Duration::from_secs(
            config.gpu.process_idle_eviction_secs,
        )));

        Ok(Self {
            config: Arc::new(config),
            sge,
            engine,
            gpu,
            logs,
            processes,
        })
    }
}
