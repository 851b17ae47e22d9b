//! Model — scheduler-facing queue and job types.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A job currently assigned to a queue instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunningJob {
    pub queue: String,
    pub number: u64,
    pub name: String,
    pub state: String,
    pub owner: String,
    pub start_time: Option<DateTime<Utc>>,
}

/// Any job known to the scheduler, running or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub number: u64,
    pub name: String,
    pub state: String,
    pub owner: String,
    pub submission_time: Option<DateTime<Utc>>,
}

/// Snapshot of scheduler state from one status query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueueStatus {
    pub running_jobs: Vec<RunningJob>,
    pub jobs: Vec<Job>,
}
