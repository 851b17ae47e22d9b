//! Qstat — pure parsing of `qstat -xml` output.
//!
//! The scheduler reports two collections: per-queue running jobs under
//! `queue_info/Queue-List`, and every known job under the inner
//! `job_info` element. Entries without a parseable job number are
//! skipped with a warning rather than failing the whole snapshot.

use chrono::{DateTime, NaiveDateTime, Utc};
use roxmltree::Node;

use super::client::SgeError;
use super::model::{Job, QueueStatus, RunningJob};

/// Parse a full `qstat -xml` document into a queue-status snapshot.
pub fn parse_qstat_xml(xml: &str) -> Result<QueueStatus, SgeError> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| SgeError::Parse(format!("invalid qstat XML: {e}")))?;
    let root = doc.root_element();

    let mut status = QueueStatus::default();

    for queue_info in root.children().filter(|n| n.has_tag_name("queue_info")) {
        for queue in queue_info
            .children()
            .filter(|n| n.has_tag_name("Queue-List"))
        {
            let queue_name = child_text(queue, "name").unwrap_or_default().to_string();
            for job in queue.children().filter(|n| n.has_tag_name("job_list")) {
                let Some(number) = job_number(job) else {
                    continue;
                };
                status.running_jobs.push(RunningJob {
                    queue: queue_name.clone(),
                    number,
                    name: child_text(job, "JB_name").unwrap_or_default().to_string(),
                    state: job_state(job),
                    owner: child_text(job, "JB_owner").unwrap_or_default().to_string(),
                    start_time: child_text(job, "JAT_start_time").and_then(parse_sge_time),
                });
            }
        }
    }

    for job_info in root.children().filter(|n| n.has_tag_name("job_info")) {
        for job in job_info.children().filter(|n| n.has_tag_name("job_list")) {
            let Some(number) = job_number(job) else {
                continue;
            };
            status.jobs.push(Job {
                number,
                name: child_text(job, "JB_name").unwrap_or_default().to_string(),
                state: job_state(job),
                owner: child_text(job, "JB_owner").unwrap_or_default().to_string(),
                submission_time: child_text(job, "JB_submission_time").and_then(parse_sge_time),
            });
        }
    }

    Ok(status)
}

fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    node.children()
        .find(|c| c.has_tag_name(tag))
        .and_then(|c| c.text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn job_number(job: Node<'_, '_>) -> Option<u64> {
    let number = child_text(job, "JB_job_number").and_then(|s| s.parse().ok());
    if number.is_none() {
        tracing::warn!("skipping job_list entry without a job number");
    }
    number
}

/// Job state as the scheduler labels it. The `state` attribute on
/// `job_list` carries the coarse label ("running"/"pending"); the
/// `state` element carries the flag string ("r", "qw", ...). The
/// attribute is preferred, matching what the dashboard displays.
fn job_state(job: Node<'_, '_>) -> String {
    job.attribute("state")
        .or_else(|| child_text(job, "state"))
        .unwrap_or_default()
        .to_string()
}

/// Scheduler timestamps are ISO-8601, usually without an offset. Bare
/// times are interpreted as UTC.
fn parse_sge_time(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
