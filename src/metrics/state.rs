use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use super::types::{RunSnapshot, TaskOutcome};

/// Hundredths of a percent at completion.
const PROGRESS_FULL_X100: u64 = 10_000;
/// Marker for "stop not requested".
const NOT_STOPPED: u64 = u64::MAX;

#[derive(Debug, Default)]
struct Ledger {
    sent: u64,
    success: u64,
    failed: u64,
    invalid_targeted: u64,
    log: Vec<TaskOutcome>,
}

/// Shared, mutable state of one run.
///
/// Workers claim sequence numbers and record outcomes concurrently through
/// `&self`. Outcome counters and the log live under one lock so every
/// snapshot satisfies `sent == success + failed`.
#[derive(Debug)]
pub struct RunState {
    started: Instant,
    duration: Duration,
    claimed: AtomicU64,
    stopped_at_ms: AtomicU64,
    ledger: Mutex<Ledger>,
}

impl RunState {
    /// Starts the run clock now.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            started: Instant::now(),
            duration,
            claimed: AtomicU64::new(0),
            stopped_at_ms: AtomicU64::new(NOT_STOPPED),
            ledger: Mutex::new(Ledger::default()),
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// True while the deadline has not passed and no stop was requested.
    #[must_use]
    pub fn should_claim(&self) -> bool {
        !self.stop_requested() && self.elapsed() < self.duration
    }

    /// Claims the next 1-based sequence number.
    pub fn claim_sequence(&self) -> u64 {
        self.claimed.fetch_add(1, Ordering::Relaxed).saturating_add(1)
    }

    /// Records one completed task.
    pub fn record(&self, outcome: TaskOutcome) {
        let mut ledger = self.lock_ledger();
        if outcome.succeeded() {
            ledger.success = ledger.success.saturating_add(1);
        } else {
            ledger.failed = ledger.failed.saturating_add(1);
        }
        if outcome.invalid {
            ledger.invalid_targeted = ledger.invalid_targeted.saturating_add(1);
        }
        ledger.sent = ledger.sent.saturating_add(1);
        ledger.log.push(outcome);
    }

    /// Fires the stop signal. Only the first call has an effect; it returns
    /// `true` when this call was the one that fired.
    pub fn request_stop(&self) -> bool {
        let at_ms = u64::try_from(self.elapsed().as_millis())
            .unwrap_or(NOT_STOPPED)
            .min(NOT_STOPPED.saturating_sub(1));
        self.stopped_at_ms
            .compare_exchange(NOT_STOPPED, at_ms, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    #[must_use]
    pub fn stop_requested(&self) -> bool {
        self.stopped_at_ms.load(Ordering::Acquire) != NOT_STOPPED
    }

    /// Run-relative time at which the stop signal fired.
    #[must_use]
    pub fn stopped_at(&self) -> Option<Duration> {
        match self.stopped_at_ms.load(Ordering::Acquire) {
            NOT_STOPPED => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// `min(100, 100 * elapsed / duration)` in hundredths of a percent.
    #[must_use]
    pub fn progress_x100(&self) -> u64 {
        progress_x100(self.elapsed(), self.duration)
    }

    #[must_use]
    pub fn snapshot(&self) -> RunSnapshot {
        let elapsed = self.elapsed();
        let claimed = self.claimed.load(Ordering::Relaxed);
        let ledger = self.lock_ledger();
        RunSnapshot {
            elapsed,
            sent: ledger.sent,
            success: ledger.success,
            failed: ledger.failed,
            in_flight: claimed.saturating_sub(ledger.sent),
            invalid_targeted: ledger.invalid_targeted,
            progress_x100: progress_x100(elapsed, self.duration),
        }
    }

    /// Communication log in completion order.
    #[must_use]
    pub fn log(&self) -> Vec<TaskOutcome> {
        self.lock_ledger().log.clone()
    }

    #[must_use]
    pub fn log_lines(&self) -> Vec<String> {
        self.lock_ledger()
            .log
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn lock_ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub(crate) fn progress_x100(elapsed: Duration, duration: Duration) -> u64 {
    let elapsed_ms = elapsed.as_millis();
    let duration_ms = duration.as_millis();
    let scaled = elapsed_ms
        .saturating_mul(u128::from(PROGRESS_FULL_X100))
        .checked_div(duration_ms)
        .unwrap_or(u128::from(PROGRESS_FULL_X100));
    u64::try_from(scaled)
        .unwrap_or(PROGRESS_FULL_X100)
        .min(PROGRESS_FULL_X100)
}
