//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;

#[cfg(test)]
mod tests;

pub use cli::{OutputFormat, RunArgs};
pub use defaults::{
    DEFAULT_BASE_URL, DEFAULT_BODY, DEFAULT_CONCURRENCY, DEFAULT_DURATION,
    DEFAULT_INVALID_PERCENT, DEFAULT_METHOD, DEFAULT_PATH,
};

pub(crate) use parsers::{parse_duration_arg, parse_header};
