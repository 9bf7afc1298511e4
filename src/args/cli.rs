use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::RawRunInput;

use super::defaults::{
    DEFAULT_BASE_URL, DEFAULT_BODY, DEFAULT_CONCURRENCY, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_DURATION, DEFAULT_INVALID_PERCENT, DEFAULT_METHOD, DEFAULT_PATH,
    DEFAULT_REQUEST_TIMEOUT,
};
use super::parsers::{parse_duration_arg, parse_header};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

/// Command-line arguments of one load run.
///
/// Run parameters (path, method, body, concurrency, duration, invalid
/// percent) stay as text here; the validator is the only place that
/// interprets them.
#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Concurrent HTTP load harness with configurable invalid-target injection."
)]
pub struct RunArgs {
    /// API base URL requests are sent to
    #[arg(long = "base-url", short = 'u', env = "MASSRUN_API_BASE", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request path, starting with '/'
    #[arg(long, short = 'p', default_value = DEFAULT_PATH, allow_hyphen_values = true)]
    pub path: String,

    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    #[arg(long, short = 'X', default_value = DEFAULT_METHOD)]
    pub method: String,

    /// JSON request body template (ignored for GET)
    #[arg(long, short = 'd', default_value = DEFAULT_BODY, allow_hyphen_values = true)]
    pub body: String,

    /// Read the JSON body template from a file
    #[arg(long = "body-file", short = 'D', conflicts_with = "body")]
    pub body_file: Option<String>,

    /// Number of concurrent workers (fractions are floored)
    #[arg(long, short = 'c', default_value = DEFAULT_CONCURRENCY, allow_negative_numbers = true)]
    pub concurrency: String,

    /// Run duration (milliseconds unless suffixed with ms/s/m/h)
    #[arg(long, short = 't', default_value = DEFAULT_DURATION, allow_negative_numbers = true)]
    pub duration: String,

    /// Percentage of requests sent to the invalid path
    #[arg(
        long = "invalid-percent",
        short = 'i',
        default_value = DEFAULT_INVALID_PERCENT,
        allow_negative_numbers = true
    )]
    pub invalid_percent: String,

    /// HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Request timeout (supports ms/s/m/h)
    #[arg(
        long = "request-timeout",
        default_value = DEFAULT_REQUEST_TIMEOUT,
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// Timeout for establishing a new connection (supports ms/s/m/h)
    #[arg(
        long = "connect-timeout",
        default_value = DEFAULT_CONNECT_TIMEOUT,
        value_parser = parse_duration_arg
    )]
    pub connect_timeout: Duration,

    /// Seed for the invalid-target draws and correlation tokens
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path to config file (TOML/JSON). Defaults to ./massrun.toml or ./massrun.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Write the summary to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// Summary format
    #[arg(long = "output-format", value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Write the communication log to this file
    #[arg(long = "log-file")]
    pub log_file: Option<String>,

    /// Disable the live progress line
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Enable verbose logging (sets log level to debug unless overridden by MASSRUN_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl RunArgs {
    /// Raw run parameters, ready for validation.
    ///
    /// `body` must already hold the body-file contents when one was given.
    #[must_use]
    pub fn raw_input(&self) -> RawRunInput {
        RawRunInput {
            path: self.path.clone(),
            method: self.method.clone(),
            body: self.body.clone(),
            concurrency: self.concurrency.clone(),
            duration: self.duration.clone(),
            invalid_percent: self.invalid_percent.clone(),
        }
    }
}
