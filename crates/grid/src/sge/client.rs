//! Client — qstat/qsub/qdel via the Grid Engine CLI.
//!
//! Every call spawns a fresh command against the configured binaries,
//! so one client can be shared freely across request handlers.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tokio::process::Command;

use crate::cli::{run_capture, CliError};

use super::model::QueueStatus;
use super::qstat::parse_qstat_xml;

#[derive(Debug, Error)]
pub enum SgeError {
    #[error(transparent)]
    Cli(#[from] CliError),
    #[error("unexpected scheduler output: {0}")]
    Parse(String),
}

/// A successfully submitted job, as reported back by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmittedJob {
    pub number: u64,
    pub name: String,
}

/// Thin client over the scheduler CLI.
#[derive(Debug, Clone)]
pub struct SgeClient {
    qstat_bin: String,
    qsub_bin: String,
    qdel_bin: String,
    script_dir: PathBuf,
}

impl SgeClient {
    pub fn new(
        qstat_bin: impl Into<String>,
        qsub_bin: impl Into<String>,
        qdel_bin: impl Into<String>,
        script_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            qstat_bin: qstat_bin.into(),
            qsub_bin: qsub_bin.into(),
            qdel_bin: qdel_bin.into(),
            script_dir: script_dir.into(),
        }
    }

    /// Current scheduler state: running jobs per queue plus all known
    /// jobs.
    pub async fn qstat(&self) -> Result<QueueStatus, SgeError> {
        let mut cmd = Command::new(&self.qstat_bin);
        cmd.arg("-xml");
        let xml = run_capture(cmd).await?;
        parse_qstat_xml(&xml)
    }

    /// Submit a job script under the given display name, exporting the
    /// provided environment into the job.
    pub async fn submit(
        &self,
        script: &str,
        name: &str,
        job_env: &BTreeMap<String, String>,
    ) -> Result<SubmittedJob, SgeError> {
        let script_path = self.script_dir.join(script);

        let mut cmd = Command::new(&self.qsub_bin);
        cmd.arg("-terse").arg("-N").arg(name);
        if !job_env.is_empty() {
            let pairs = job_env
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(",");
            cmd.arg("-v").arg(pairs);
        }
        cmd.arg(&script_path);

        let stdout = run_capture(cmd).await?;
        let number = parse_submit_output(&stdout)?;
        tracing::info!(job = number, script, "job submitted");

        Ok(SubmittedJob {
            number,
            name: name.to_string(),
        })
    }

    /// Remove a job from the scheduler queue.
    pub async fn delete(&self, job_number: u64) -> Result<(), SgeError> {
        let mut cmd = Command::new(&self.qdel_bin);
        cmd.arg(job_number.to_string());
        run_capture(cmd).await?;
        tracing::info!(job = job_number, "job deleted");
        Ok(())
    }
}

/// `qsub -terse` prints the bare job id; array jobs append a task range
/// after a dot.
fn parse_submit_output(stdout: &str) -> Result<u64, SgeError> {
    let token = stdout.trim().split_whitespace().next().unwrap_or("");
    let id = token.split('.').next().unwrap_or(token);
    id.parse()
        .map_err(|_| SgeError::Parse(format!("qsub did not return a job id: {stdout:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_job_id() {
        assert_eq!(parse_submit_output("4711\n").unwrap(), 4711);
    }

    #[test]
    fn test_parse_array_job_id() {
        assert_eq!(parse_submit_output("4712.1-10:1\n").unwrap(), 4712);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_submit_output("Your job 1 has been submitted"),
            Err(SgeError::Parse(_))
        ));
        assert!(matches!(parse_submit_output(""), Err(SgeError::Parse(_))));
    }
}
