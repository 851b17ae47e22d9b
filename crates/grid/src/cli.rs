//! Collaborator CLI invocation.
//!
//! The scheduler and GPU telemetry adapters shell out to their external
//! binaries; this module holds the shared run-and-capture helper and its
//! error type.

use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{command} exited with status {code}: {stderr}")]
    Failed {
        command: String,
        code: i32,
        stderr: String,
    },
}

/// Run a command to completion and capture stdout. A non-zero exit
/// status becomes an error carrying the trimmed stderr.
pub async fn run_capture(mut cmd: Command) -> Result<String, CliError> {
    let command = cmd
        .as_std()
        .get_program()
        .to_string_lossy()
        .into_owned();

    tracing::debug!(command = %command, "running collaborator command");

    let output = cmd.output().await.map_err(|source| CliError::Spawn {
        command: command.clone(),
        source,
    })?;

    if !output.status.success() {
        return Err(CliError::Failed {
            command,
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
