//! Run parameters and the validator that produces them.
pub(crate) mod parse;
mod run;
mod validate;

#[cfg(test)]
mod tests;

pub use run::{
    BodyTemplate, DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_DURATION_MS, DEFAULT_MAX_INVALID_PPM,
    DEFAULT_MIN_DURATION_MS, DEFAULT_MIN_INVALID_PPM, HttpMethod, InvalidRatio, PPM_SCALE,
    RunConfig, RunLimits,
};
pub use validate::{RawRunInput, validate_run_config};
