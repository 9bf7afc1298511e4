use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue};

use crate::domain::parse::{DefaultUnit, parse_duration_value};
use crate::error::ValidationError;

pub(crate) fn parse_header(s: &str) -> Result<(String, String), ValidationError> {
    let invalid = || ValidationError::InvalidHeaderFormat {
        value: s.to_owned(),
    };
    let (key, value) = s.split_once(':').ok_or_else(invalid)?;
    let key = key.trim();
    let value = value.trim();
    if HeaderName::from_bytes(key.as_bytes()).is_err() || HeaderValue::from_str(value).is_err() {
        return Err(invalid());
    }
    Ok((key.to_owned(), value.to_owned()))
}

/// Parses a timeout; bare numbers are seconds and zero is rejected.
pub(crate) fn parse_duration_arg(s: &str) -> Result<Duration, ValidationError> {
    let duration = parse_duration_value(s, DefaultUnit::Seconds)?;
    if duration.as_millis() == 0 {
        return Err(ValidationError::ValueTooSmall { min: 1 });
    }
    Ok(duration)
}
