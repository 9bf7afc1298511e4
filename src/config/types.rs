use std::time::Duration;

use serde::Deserialize;

use crate::args::OutputFormat;
use crate::domain::parse::{DefaultUnit, parse_duration_value, parse_percent};
use crate::domain::{InvalidRatio, RunLimits};
use crate::error::{ConfigError, RunField, ValidationError};

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(alias = "api_base")]
    pub base_url: Option<String>,
    pub path: Option<String>,
    pub method: Option<String>,
    pub body: Option<BodyValue>,
    pub body_file: Option<String>,
    pub concurrency: Option<NumberValue>,
    pub duration: Option<DurationValue>,
    pub invalid_percent: Option<NumberValue>,
    pub headers: Option<Vec<String>>,
    pub request_timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub seed: Option<u64>,
    pub output: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub log_file: Option<String>,
    pub no_progress: Option<bool>,
    pub no_color: Option<bool>,
    pub limits: Option<LimitsConfig>,
}

/// Validator windows from the `[limits]` section.
#[derive(Debug, Default, Deserialize)]
pub struct LimitsConfig {
    pub min_duration_ms: Option<u64>,
    pub max_duration_ms: Option<u64>,
    pub min_invalid_percent: Option<NumberValue>,
    pub max_invalid_percent: Option<NumberValue>,
    pub max_concurrency: Option<usize>,
}

impl LimitsConfig {
    /// Overlays the configured bounds on the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when a percent bound is malformed, a minimum exceeds
    /// its maximum, or `max_concurrency` is zero.
    pub fn to_limits(&self) -> Result<RunLimits, ConfigError> {
        let defaults = RunLimits::default();
        let min_invalid = match self.min_invalid_percent.as_ref() {
            Some(value) => parse_limit_percent(value, "min_invalid_percent")?,
            None => defaults.min_invalid(),
        };
        let max_invalid = match self.max_invalid_percent.as_ref() {
            Some(value) => parse_limit_percent(value, "max_invalid_percent")?,
            None => defaults.max_invalid(),
        };
        let limits = RunLimits::new(
            self.min_duration_ms
                .unwrap_or_else(|| defaults.min_duration_ms()),
            self.max_duration_ms
                .unwrap_or_else(|| defaults.max_duration_ms()),
            min_invalid,
            max_invalid,
        )
        .map_err(|err| ConfigError::InvalidLimit {
            field: limit_field(&err),
            source: err,
        })?;
        match self.max_concurrency {
            Some(max) => limits
                .with_max_concurrency(max)
                .map_err(|err| ConfigError::InvalidLimit {
                    field: "max_concurrency",
                    source: err,
                }),
            None => Ok(limits),
        }
    }
}

fn parse_limit_percent(
    value: &NumberValue,
    field: &'static str,
) -> Result<InvalidRatio, ConfigError> {
    let text = value.to_text();
    match parse_percent(&text) {
        Some((false, ratio)) => Ok(ratio),
        Some((true, _)) | None => Err(ConfigError::InvalidLimit {
            field,
            source: ValidationError::InvalidPercentNotNumber { value: text },
        }),
    }
}

fn limit_field(err: &ValidationError) -> &'static str {
    if err.field() == Some(RunField::InvalidPercent) {
        "invalid_percent"
    } else {
        "duration_ms"
    }
}

/// Number given either as a TOML/JSON number or as text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl NumberValue {
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            NumberValue::Integer(value) => value.to_string(),
            NumberValue::Float(value) => value.to_string(),
            NumberValue::Text(text) => text.clone(),
        }
    }
}

/// Duration given as a bare number or as text with a unit suffix.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Number(u64),
    Text(String),
}

impl DurationValue {
    /// Text handed to the validator; bare numbers are milliseconds there.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            DurationValue::Number(value) => value.to_string(),
            DurationValue::Text(text) => text.clone(),
        }
    }

    /// Timeout value; bare numbers are seconds.
    ///
    /// # Errors
    ///
    /// Returns an error when the text is malformed or the value is zero.
    pub fn to_timeout(&self) -> Result<Duration, ValidationError> {
        let duration = match self {
            DurationValue::Number(secs) => Duration::from_secs(*secs),
            DurationValue::Text(text) => parse_duration_value(text, DefaultUnit::Seconds)?,
        };
        if duration.is_zero() {
            return Err(ValidationError::ValueTooSmall { min: 1 });
        }
        Ok(duration)
    }
}

/// Body template given as raw JSON text or inline as a table/object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BodyValue {
    Text(String),
    Inline(serde_json::Value),
}

impl BodyValue {
    /// # Errors
    ///
    /// Returns an error when an inline body cannot be encoded as JSON.
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        match self {
            BodyValue::Text(text) => Ok(text.clone()),
            BodyValue::Inline(value) => serde_json::to_string(value),
        }
    }
}
