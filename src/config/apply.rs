use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{RunArgs, parse_header};
use crate::domain::RunLimits;
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments.
///
/// Values given on the command line or through the environment win over
/// the config file.
///
/// # Errors
///
/// Returns an error when a config header or timeout is invalid, or an
/// inline body cannot be encoded.
pub fn apply_config(
    args: &mut RunArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "base_url")
        && let Some(base_url) = config.base_url.clone()
    {
        args.base_url = base_url;
    }

    if !is_cli(matches, "path")
        && let Some(path) = config.path.clone()
    {
        args.path = path;
    }

    if !is_cli(matches, "method")
        && let Some(method) = config.method.clone()
    {
        args.method = method;
    }

    let body_from_cli = is_cli(matches, "body") || is_cli(matches, "body_file");
    if !body_from_cli {
        if let Some(body) = config.body.as_ref() {
            args.body = body.to_text()?;
        }
        if let Some(path) = config.body_file.clone() {
            args.body_file = Some(path);
        }
    }

    if !is_cli(matches, "concurrency")
        && let Some(concurrency) = config.concurrency.as_ref()
    {
        args.concurrency = concurrency.to_text();
    }

    if !is_cli(matches, "duration")
        && let Some(duration) = config.duration.as_ref()
    {
        args.duration = duration.to_text();
    }

    if !is_cli(matches, "invalid_percent")
        && let Some(percent) = config.invalid_percent.as_ref()
    {
        args.invalid_percent = percent.to_text();
    }

    if !is_cli(matches, "headers")
        && let Some(headers) = config.headers.as_ref()
    {
        let mut parsed = Vec::with_capacity(headers.len());
        for header in headers {
            parsed.push(
                parse_header(header)
                    .map_err(|err| AppError::config(ConfigError::InvalidHeader { source: err }))?,
            );
        }
        args.headers = parsed;
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.request_timeout.as_ref()
    {
        args.request_timeout = timeout.to_timeout()?;
    }

    if !is_cli(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = timeout.to_timeout()?;
    }

    if !is_cli(matches, "seed")
        && let Some(seed) = config.seed
    {
        args.seed = Some(seed);
    }

    if !is_cli(matches, "output")
        && let Some(output) = config.output.clone()
    {
        args.output = Some(output);
    }

    if !is_cli(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    if !is_cli(matches, "log_file")
        && let Some(path) = config.log_file.clone()
    {
        args.log_file = Some(path);
    }

    if !is_cli(matches, "no_progress")
        && let Some(no_progress) = config.no_progress
    {
        args.no_progress = no_progress;
    }

    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    Ok(())
}

/// Validator windows: the config file's `[limits]` over the defaults.
///
/// # Errors
///
/// Returns an error when the configured limits are malformed or inverted.
pub fn resolve_limits(config: Option<&ConfigFile>) -> AppResult<RunLimits> {
    match config.and_then(|config| config.limits.as_ref()) {
        Some(limits) => limits.to_limits().map_err(AppError::config),
        None => Ok(RunLimits::default()),
    }
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}
