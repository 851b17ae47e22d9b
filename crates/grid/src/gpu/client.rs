//! Client — GPU telemetry query via nvidia-smi.

use thiserror::Error;
use tokio::process::Command;

use crate::cli::{run_capture, CliError};

use super::smi::{parse_smi_xml, GpuReport};

#[derive(Debug, Error)]
pub enum GpuError {
    #[error(transparent)]
    Cli(#[from] CliError),
    #[error("unexpected telemetry output: {0}")]
    Parse(String),
}

/// Thin client over the telemetry CLI. Stateless; spawns a fresh
/// command per query.
#[derive(Debug, Clone)]
pub struct GpuClient {
    smi_bin: String,
}

impl GpuClient {
    pub fn new(smi_bin: impl Into<String>) -> Self {
        Self {
            smi_bin: smi_bin.into(),
        }
    }

    /// One telemetry snapshot across all attached GPUs.
    pub async fn query(&self) -> Result<GpuReport, GpuError> {
        let mut cmd = Command::new(&self.smi_bin);
        cmd.arg("-q").arg("-x");
        let xml = run_capture(cmd).await?;
        parse_smi_xml(&xml)
    }
}
