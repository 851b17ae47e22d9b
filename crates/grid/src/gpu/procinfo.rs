//! Procinfo — live process metadata for GPU process rows.
//!
//! The telemetry report carries only pid, name, and GPU memory; the
//! dashboard enriches each row with the command line and resident set
//! read from `/proc`. Entries are kept warm between polls and evicted
//! once idle past the configured window.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;

/// Assumed by the resident-set conversion; /proc/<pid>/statm counts
/// pages.
const PAGE_SIZE: u64 = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessInfo {
    pub pid: u32,
    /// Short name from /proc/<pid>/comm.
    pub command: String,
    /// Full command line, NUL separators replaced with spaces.
    pub cmdline: String,
    pub rss_bytes: Option<u64>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    last_used: Instant,
    info: ProcessInfo,
}

/// Pid-keyed cache of process metadata.
///
/// The static fields (comm, cmdline) are read once per pid; the
/// resident set is refreshed on every lookup. Entries for exited
/// processes age out once the telemetry stops naming their pid.
#[derive(Debug)]
pub struct ProcessCache {
    entries: DashMap<u32, CacheEntry>,
    idle_eviction: Duration,
}

impl ProcessCache {
    pub fn new(idle_eviction: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            idle_eviction,
        }
    }

    /// Look up a pid, refreshing its resident set and last-used stamp.
    /// Returns `None` when the process no longer exists.
    pub fn lookup(&self, pid: u32) -> Option<ProcessInfo> {
        if let Some(mut entry) = self.entries.get_mut(&pid) {
            entry.last_used = Instant::now();
            entry.info.rss_bytes = read_rss(pid);
            return Some(entry.info.clone());
        }

        let info = read_proc(pid)?;
        self.entries.insert(
            pid,
            CacheEntry {
                last_used: Instant::now(),
                info: info.clone(),
            },
        );
        Some(info)
    }

    /// Drop entries not touched within the eviction window.
    pub fn evict_stale(&self) {
        let window = self.idle_eviction;
        self.entries.retain(|_, e| e.last_used.elapsed() <= window);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ProcessCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(10 * 60))
    }
}

fn read_proc(pid: u32) -> Option<ProcessInfo> {
    let command = std::fs::read_to_string(format!("/proc/{pid}/comm"))
        .ok()?
        .trim()
        .to_string();
    let cmdline = std::fs::read(format!("/proc/{pid}/cmdline"))
        .ok()
        .map(|bytes| {
            String::from_utf8_lossy(&bytes)
                .split('\0')
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    Some(ProcessInfo {
        pid,
        command,
        cmdline,
        rss_bytes: read_rss(pid),
    })
}

/// Resident set from /proc/<pid>/statm (second field, in pages).
fn read_rss(pid: u32) -> Option<u64> {
    let statm = std::fs::read_to_string(format!("/proc/{pid}/statm")).ok()?;
    let pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
    Some(pages * PAGE_SIZE)
}
