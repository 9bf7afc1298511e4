//! Run counters, the communication log, and the final summary.
mod state;
mod summary;
mod types;


pub use state::RunState;
pub use summary::summarize;
pub use types::{RunSnapshot, RunSummary, TaskOutcome, TaskResult};
