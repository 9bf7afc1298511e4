use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::domain::RunConfig;
use crate::http::{RandomSource, RequestExecutor, build_request};
use crate::metrics::{RunState, TaskOutcome, TaskResult};

pub(super) struct WorkerContext {
    pub(super) id: usize,
    pub(super) config: Arc<RunConfig>,
    pub(super) executor: Arc<dyn RequestExecutor>,
    pub(super) headers: Arc<[(String, String)]>,
    pub(super) state: Arc<RunState>,
}

/// Claims and runs one request at a time until the deadline passes or a
/// stop is requested. The check happens only between requests; an
/// in-flight request always completes and is recorded.
pub(super) async fn run_worker<R>(ctx: WorkerContext, mut rng: R) -> u64
where
    R: RandomSource,
{
    let mut completed: u64 = 0;
    while ctx.state.should_claim() {
        let seq = ctx.state.claim_sequence();
        let outcome = run_task(&ctx, seq, &mut rng).await;
        debug!(
            "worker {} #{} -> {} {}",
            ctx.id,
            outcome.seq,
            outcome.path,
            if outcome.succeeded() { "ok" } else { "failed" }
        );
        ctx.state.record(outcome);
        completed = completed.saturating_add(1);
    }
    debug!("worker {} exiting after {} requests", ctx.id, completed);
    completed
}

async fn run_task<R>(ctx: &WorkerContext, seq: u64, rng: &mut R) -> TaskOutcome
where
    R: RandomSource,
{
    let timestamp = Utc::now();
    let request = match build_request(&ctx.config, seq, &ctx.headers, rng) {
        Ok(request) => request,
        Err(err) => {
            return TaskOutcome {
                seq,
                path: ctx.config.path().to_owned(),
                invalid: false,
                timestamp,
                result: TaskResult::Failure {
                    message: err.to_string(),
                },
            };
        }
    };

    let result = match ctx.executor.execute(&request).await {
        Ok(()) => TaskResult::Success,
        Err(failure) => TaskResult::Failure {
            message: failure.to_string(),
        },
    };
    TaskOutcome {
        seq,
        path: request.path,
        invalid: request.invalid,
        timestamp,
        result,
    }
}
