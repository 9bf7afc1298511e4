use std::time::Duration;

use crate::domain::RunConfig;

use super::state::RunState;
use super::types::RunSummary;

/// Assembles the final report. Call once, after every worker has exited.
///
/// The run counts as stopped when the stop signal fired before the
/// configured duration elapsed.
#[must_use]
pub fn summarize(
    state: &RunState,
    config: &RunConfig,
    elapsed: Duration,
    api_base: String,
) -> RunSummary {
    let snapshot = state.snapshot();
    let stopped = state
        .stopped_at()
        .is_some_and(|at| at < config.duration());

    RunSummary {
        count: snapshot.sent,
        success: snapshot.success,
        failed: snapshot.failed,
        invalid_targeted: snapshot.invalid_targeted,
        duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        concurrency: config.concurrency(),
        api_base,
        path: config.path().to_owned(),
        method: config.method(),
        invalid_percent: config.invalid_ratio().percent_text(),
        stopped,
    }
}
