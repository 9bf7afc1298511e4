use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Result of one attempted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    Success,
    Failure { message: String },
}

/// Record of one completed task, kept in the communication log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub seq: u64,
    pub path: String,
    pub invalid: bool,
    pub timestamp: DateTime<Utc>,
    pub result: TaskResult,
}

impl TaskOutcome {
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self.result, TaskResult::Success)
    }
}

impl std::fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ts = self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
        match &self.result {
            TaskResult::Success => write!(
                f,
                "[{}] #{} -> {} OK{}",
                ts,
                self.seq,
                self.path,
                if self.invalid {
                    " (invalid target succeeded)"
                } else {
                    ""
                }
            ),
            TaskResult::Failure { message } => {
                write!(f, "[{}] #{} -> {} FAIL: {}", ts, self.seq, self.path, message)
            }
        }
    }
}

/// Point-in-time view of a run in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSnapshot {
    pub elapsed: Duration,
    pub sent: u64,
    pub success: u64,
    pub failed: u64,
    pub in_flight: u64,
    pub invalid_targeted: u64,
    /// Progress in hundredths of a percent, `0..=10_000`.
    pub progress_x100: u64,
}

/// Final report of a run, produced once after every worker has exited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub count: u64,
    pub success: u64,
    pub failed: u64,
    pub invalid_targeted: u64,
    pub duration_ms: u64,
    pub concurrency: usize,
    pub api_base: String,
    pub path: String,
    pub method: crate::domain::HttpMethod,
    pub invalid_percent: String,
    pub stopped: bool,
}
