//! Worker pool that drives one run from start to summary.
mod worker;


use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::domain::RunConfig;
use crate::http::{RequestExecutor, RngSeed};
use crate::metrics::{RunState, RunSummary, summarize};

use worker::{WorkerContext, run_worker};

/// One load run: a validated config, a request executor, and the shared
/// state every worker writes to.
///
/// The run clock starts when the `LoadRun` is created, so create it right
/// before calling [`LoadRun::run`]. Use [`LoadRun::state`] to observe
/// progress or fire the stop signal while the run is in flight.
pub struct LoadRun {
    config: Arc<RunConfig>,
    executor: Arc<dyn RequestExecutor>,
    headers: Arc<[(String, String)]>,
    seed: RngSeed,
    state: Arc<RunState>,
}

impl LoadRun {
    #[must_use]
    pub fn new(config: RunConfig, executor: Arc<dyn RequestExecutor>) -> Self {
        let state = Arc::new(RunState::new(config.duration()));
        Self {
            config: Arc::new(config),
            executor,
            headers: Arc::from(Vec::new()),
            seed: RngSeed::Entropy,
            state,
        }
    }

    /// Extra headers sent with every request.
    #[must_use]
    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = Arc::from(headers);
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: RngSeed) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn state(&self) -> Arc<RunState> {
        Arc::clone(&self.state)
    }

    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs every worker to completion and returns the summary.
    ///
    /// Spawns exactly `concurrency` workers and waits for all of them to
    /// exit before the summary is assembled. Request failures never end the
    /// run early.
    pub async fn run(self) -> RunSummary {
        let workers = self.config.concurrency();
        info!(
            "Starting run: {} {} with {} workers for {} ms (invalid ratio {}%)",
            self.config.method(),
            self.config.path(),
            workers,
            self.config.duration().as_millis(),
            self.config.invalid_ratio().percent_text()
        );

        let mut tasks = JoinSet::new();
        for id in 0..workers {
            let ctx = WorkerContext {
                id,
                config: Arc::clone(&self.config),
                executor: Arc::clone(&self.executor),
                headers: Arc::clone(&self.headers),
                state: Arc::clone(&self.state),
            };
            tasks.spawn(run_worker(ctx, self.seed.for_worker(id)));
        }

        while let Some(result) = tasks.join_next().await {
            if let Err(err) = result {
                error!("Worker task failed: {}", err);
            }
        }

        let elapsed = self.state.elapsed();
        let summary = summarize(
            &self.state,
            &self.config,
            elapsed,
            self.executor.base_address(),
        );
        if summary.stopped {
            warn!(
                "Run stopped early after {} ms ({} requests)",
                summary.duration_ms, summary.count
            );
        }
        info!(
            "Run finished: {} requests ({} ok, {} failed) in {} ms",
            summary.count, summary.success, summary.failed, summary.duration_ms
        );
        summary
    }
}
