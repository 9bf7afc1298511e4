//! Terminal and file output of a run.
pub(crate) mod logs;
pub(crate) mod progress;
pub(crate) mod summary;

pub(crate) use logs::write_log_file;
pub(crate) use progress::setup_progress_indicator;
pub(crate) use summary::{render_summary, write_summary};
