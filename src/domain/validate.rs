use std::num::NonZeroUsize;
use std::time::Duration;

use crate::error::{MalformedBodyError, RunConfigError, ValidationError};

use super::parse::{DefaultUnit, floor_decimal, parse_decimal, parse_duration_value, parse_percent};
use super::run::{BodyTemplate, HttpMethod, InvalidRatio, RunConfig, RunLimits};

/// Run parameters exactly as the user supplied them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRunInput {
    pub path: String,
    pub method: String,
    pub body: String,
    pub concurrency: String,
    pub duration: String,
    pub invalid_percent: String,
}

/// Validates raw input into a [`RunConfig`].
///
/// Rules run in a fixed order (path, method, concurrency, duration, invalid
/// percent, body) and the first failure is returned. The body is parsed even
/// for GET so that a malformed template is reported before any run starts.
///
/// # Errors
///
/// Returns [`RunConfigError::Validation`] naming the offending field, or
/// [`RunConfigError::MalformedBody`] when the body is not valid JSON.
pub fn validate_run_config(
    raw: &RawRunInput,
    limits: &RunLimits,
) -> Result<RunConfig, RunConfigError> {
    let path = validate_path(&raw.path)?;
    let method: HttpMethod = raw.method.parse()?;
    let concurrency = validate_concurrency(&raw.concurrency, limits)?;
    let duration = validate_duration(&raw.duration, limits)?;
    let invalid_ratio = validate_invalid_percent(&raw.invalid_percent, limits)?;
    let body = parse_body(&raw.body)?;

    Ok(RunConfig {
        path,
        method,
        body,
        concurrency,
        duration,
        invalid_ratio,
    })
}

fn validate_path(value: &str) -> Result<String, ValidationError> {
    let path = value.trim();
    if path.is_empty() {
        return Err(ValidationError::PathEmpty);
    }
    if !path.starts_with('/') {
        return Err(ValidationError::PathMissingLeadingSlash {
            path: path.to_owned(),
        });
    }
    Ok(path.to_owned())
}

fn validate_concurrency(value: &str, limits: &RunLimits) -> Result<NonZeroUsize, ValidationError> {
    let decimal = parse_decimal(value).ok_or_else(|| ValidationError::ConcurrencyNotNumber {
        value: value.to_owned(),
    })?;
    if decimal.negative || decimal.is_zero() {
        return Err(ValidationError::ConcurrencyNotPositive {
            value: value.to_owned(),
        });
    }
    let too_large = || ValidationError::ConcurrencyTooLarge {
        value: value.to_owned(),
        max: limits.max_concurrency(),
    };
    let floored = floor_decimal(&decimal).ok_or_else(too_large)?;
    let workers = usize::try_from(floored).map_err(|_err| too_large())?;
    if workers > limits.max_concurrency() {
        return Err(too_large());
    }
    // 0 < value < 1 floors to zero; a run always has at least one worker.
    Ok(NonZeroUsize::new(workers).unwrap_or(NonZeroUsize::MIN))
}

fn validate_duration(value: &str, limits: &RunLimits) -> Result<Duration, ValidationError> {
    let duration = parse_duration_value(value, DefaultUnit::Millis)?;
    let value_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    if value_ms < limits.min_duration_ms() || value_ms > limits.max_duration_ms() {
        return Err(ValidationError::DurationOutOfRange {
            value_ms,
            min_ms: limits.min_duration_ms(),
            max_ms: limits.max_duration_ms(),
        });
    }
    Ok(duration)
}

fn validate_invalid_percent(
    value: &str,
    limits: &RunLimits,
) -> Result<InvalidRatio, ValidationError> {
    let (negative, ratio) =
        parse_percent(value).ok_or_else(|| ValidationError::InvalidPercentNotNumber {
            value: value.to_owned(),
        })?;
    let out_of_range = (negative && ratio.ppm() > 0)
        || ratio < limits.min_invalid()
        || ratio > limits.max_invalid();
    if out_of_range {
        return Err(ValidationError::InvalidPercentOutOfRange {
            value: value.trim().to_owned(),
            min: limits.min_invalid().percent_text(),
            max: limits.max_invalid().percent_text(),
        });
    }
    Ok(ratio)
}

fn parse_body(value: &str) -> Result<Option<BodyTemplate>, MalformedBodyError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<serde_json::Value>(trimmed)
        .map(|parsed| Some(BodyTemplate::from(parsed)))
        .map_err(|err| MalformedBodyError { source: err })
}
