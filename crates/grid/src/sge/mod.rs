//! Batch scheduler adapter (Grid Engine CLI).
//!
//! - `model.rs`: queue/job types surfaced to the dashboard
//! - `qstat.rs`: pure parsing of `qstat -xml` output
//! - `client.rs`: qstat/qsub/qdel invocation

pub mod client;
pub mod model;
pub mod qstat;

pub use client::{SgeClient, SgeError, SubmittedJob};
pub use model::{Job, QueueStatus, RunningJob};
pub use qstat::parse_qstat_xml;
