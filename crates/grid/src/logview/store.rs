//! Store — on-disk log lookup for submitted jobs.
//!
//! The scheduler's epilog writes one `<job_number>.log` per job into a
//! single directory. Lookup is by existence check; a missing file is a
//! typed not-found error and the parser is never invoked for it.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::LogDocument;
use super::parse::parse_log;

#[derive(Debug, Error)]
pub enum LogStoreError {
    #[error("no log recorded for job {0}")]
    NotFound(u64),
    #[error("failed to read log for job {job}: {source}")]
    Io {
        job: u64,
        #[source]
        source: std::io::Error,
    },
}

/// Locates job logs under a single directory.
#[derive(Debug, Clone)]
pub struct LogStore {
    log_dir: PathBuf,
}

impl LogStore {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Path of the log for a job, or `None` when the job never produced
    /// one.
    pub fn find(&self, job_number: u64) -> Option<PathBuf> {
        let path = self.log_dir.join(format!("{job_number}.log"));
        path.exists().then_some(path)
    }

    pub fn has_log(&self, job_number: u64) -> bool {
        self.find(job_number).is_some()
    }

    /// Verbatim log contents, served unmodified for diagnostic download.
    pub async fn read_raw(&self, job_number: u64) -> Result<String, LogStoreError> {
        let path = self
            .find(job_number)
            .ok_or(LogStoreError::NotFound(job_number))?;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LogStoreError::Io {
                job: job_number,
                source,
            })
    }

    /// Parsed sectioned view of the log.
    pub async fn read_document(&self, job_number: u64) -> Result<LogDocument, LogStoreError> {
        let raw = self.read_raw(job_number).await?;
        Ok(parse_log(raw.lines()))
    }
}
