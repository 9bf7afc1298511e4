use super::parse::{DefaultUnit, parse_decimal, parse_duration_value, parse_percent};
use super::*;
use crate::error::{RunConfigError, RunField, ValidationError};
use std::time::Duration;

fn raw_input() -> RawRunInput {
    RawRunInput {
        path: "/api/data".to_owned(),
        method: "POST".to_owned(),
        body: r#"{"content":"load-test"}"#.to_owned(),
        concurrency: "5".to_owned(),
        duration: "60000".to_owned(),
        invalid_percent: "0.1".to_owned(),
    }
}

fn expect_field(result: Result<RunConfig, RunConfigError>, field: RunField) -> Result<(), String> {
    match result {
        Ok(_) => Err(format!("Expected {} to be rejected", field)),
        Err(err) if err.field() == Some(field) => Ok(()),
        Err(err) => Err(format!("Expected {} error, got: {}", field, err)),
    }
}

#[test]
fn default_form_values_validate() -> Result<(), String> {
    let config = validate_run_config(&raw_input(), &RunLimits::default())
        .map_err(|err| format!("validation failed: {}", err))?;
    if config.path() != "/api/data" {
        return Err(format!("Unexpected path: {}", config.path()));
    }
    if config.method() != HttpMethod::Post {
        return Err(format!("Unexpected method: {}", config.method()));
    }
    if config.concurrency() != 5 {
        return Err(format!("Unexpected concurrency: {}", config.concurrency()));
    }
    if config.duration() != Duration::from_secs(60) {
        return Err(format!("Unexpected duration: {:?}", config.duration()));
    }
    if config.invalid_ratio().ppm() != 1_000 {
        return Err(format!("Unexpected ratio: {:?}", config.invalid_ratio()));
    }
    match config.body() {
        Some(BodyTemplate::Object(map)) if map.contains_key("content") => Ok(()),
        other => Err(format!("Unexpected body: {:?}", other)),
    }
}

#[test]
fn path_is_trimmed_and_must_start_with_slash() -> Result<(), String> {
    let mut raw = raw_input();
    raw.path = "  /api/items  ".to_owned();
    let config = validate_run_config(&raw, &RunLimits::default())
        .map_err(|err| format!("validation failed: {}", err))?;
    if config.path() != "/api/items" {
        return Err(format!("Path was not trimmed: '{}'", config.path()));
    }

    raw.path = "api/items".to_owned();
    expect_field(validate_run_config(&raw, &RunLimits::default()), RunField::Path)?;
    raw.path = "   ".to_owned();
    expect_field(validate_run_config(&raw, &RunLimits::default()), RunField::Path)
}

#[test]
fn method_is_case_insensitive_and_restricted() -> Result<(), String> {
    let mut raw = raw_input();
    raw.method = "patch".to_owned();
    let config = validate_run_config(&raw, &RunLimits::default())
        .map_err(|err| format!("validation failed: {}", err))?;
    if config.method() != HttpMethod::Patch {
        return Err(format!("Unexpected method: {}", config.method()));
    }

    raw.method = "HEAD".to_owned();
    expect_field(validate_run_config(&raw, &RunLimits::default()), RunField::Method)
}

#[test]
fn zero_or_negative_concurrency_is_rejected() -> Result<(), String> {
    for value in ["0", "-1", "-0.5", "0.0"] {
        let mut raw = raw_input();
        raw.concurrency = value.to_owned();
        match validate_run_config(&raw, &RunLimits::default()) {
            Err(RunConfigError::Validation(ValidationError::ConcurrencyNotPositive { .. })) => {}
            other => return Err(format!("Unexpected result for '{}': {:?}", value, other)),
        }
    }
    for value in ["abc", "NaN", "inf", "1e3", ""] {
        let mut raw = raw_input();
        raw.concurrency = value.to_owned();
        expect_field(
            validate_run_config(&raw, &RunLimits::default()),
            RunField::Concurrency,
        )?;
    }
    Ok(())
}

#[test]
fn fractional_concurrency_is_floored_to_at_least_one() -> Result<(), String> {
    for (value, expected) in [("2.9", 2), ("0.4", 1), ("1", 1), ("12.", 12)] {
        let mut raw = raw_input();
        raw.concurrency = value.to_owned();
        let config = validate_run_config(&raw, &RunLimits::default())
            .map_err(|err| format!("validation failed for '{}': {}", value, err))?;
        if config.concurrency() != expected {
            return Err(format!(
                "Expected {} workers for '{}', got {}",
                expected,
                value,
                config.concurrency()
            ));
        }
    }
    Ok(())
}

#[test]
fn concurrency_above_the_cap_is_rejected() -> Result<(), String> {
    let limits = RunLimits::default();
    let mut raw = raw_input();
    raw.concurrency = DEFAULT_MAX_CONCURRENCY.to_string();
    let config = validate_run_config(&raw, &limits)
        .map_err(|err| format!("cap itself should be accepted: {}", err))?;
    if config.concurrency() != DEFAULT_MAX_CONCURRENCY {
        return Err(format!("Unexpected concurrency: {}", config.concurrency()));
    }

    for value in [
        "10001",
        "2305843009213693952",
        "99999999999999999999999999",
        "18446744073709551616.5",
    ] {
        raw.concurrency = value.to_owned();
        match validate_run_config(&raw, &limits) {
            Err(RunConfigError::Validation(ValidationError::ConcurrencyTooLarge {
                max: DEFAULT_MAX_CONCURRENCY,
                ..
            })) => {}
            other => return Err(format!("Unexpected result for '{}': {:?}", value, other)),
        }
    }

    let narrow = RunLimits::default()
        .with_max_concurrency(8)
        .map_err(|err| format!("cap rejected: {}", err))?;
    raw.concurrency = "8.7".to_owned();
    validate_run_config(&raw, &narrow).map_err(|err| format!("8.7 should floor to 8: {}", err))?;
    raw.concurrency = "9".to_owned();
    expect_field(validate_run_config(&raw, &narrow), RunField::Concurrency)?;

    match RunLimits::default().with_max_concurrency(0) {
        Err(ValidationError::ValueTooSmall { min: 1 }) => Ok(()),
        other => Err(format!("Zero cap should be rejected: {:?}", other)),
    }
}

#[test]
fn fractional_duration_is_floored_to_whole_millis() -> Result<(), String> {
    let limits = RunLimits::default();
    for (value, expected_ms) in [("10000.5", 10_000), ("12.25s", 12_250), ("0.5m", 30_000)] {
        let mut raw = raw_input();
        raw.duration = value.to_owned();
        let config = validate_run_config(&raw, &limits)
            .map_err(|err| format!("'{}' should be accepted: {}", value, err))?;
        if config.duration() != Duration::from_millis(expected_ms) {
            return Err(format!(
                "Expected {} ms for '{}', got {:?}",
                expected_ms,
                value,
                config.duration()
            ));
        }
    }
    for value in ["9999.9", "300000.1x", ".", "1.2.3"] {
        let mut raw = raw_input();
        raw.duration = value.to_owned();
        expect_field(validate_run_config(&raw, &limits), RunField::Duration)?;
    }
    Ok(())
}

#[test]
fn duration_bounds_are_inclusive_and_configurable() -> Result<(), String> {
    let limits = RunLimits::default();
    for value in ["10000", "300000", "10s", "5m"] {
        let mut raw = raw_input();
        raw.duration = value.to_owned();
        validate_run_config(&raw, &limits)
            .map_err(|err| format!("'{}' should be accepted: {}", value, err))?;
    }
    for value in ["9999", "300001", "1h", "ten", "10x"] {
        let mut raw = raw_input();
        raw.duration = value.to_owned();
        expect_field(validate_run_config(&raw, &limits), RunField::Duration)?;
    }

    let narrow = RunLimits::new(
        10_000,
        120_000,
        InvalidRatio::from_ppm(DEFAULT_MIN_INVALID_PPM),
        InvalidRatio::from_ppm(DEFAULT_MAX_INVALID_PPM),
    )
    .map_err(|err| format!("limits rejected: {}", err))?;
    let mut raw = raw_input();
    raw.duration = "150000".to_owned();
    expect_field(validate_run_config(&raw, &narrow), RunField::Duration)
}

#[test]
fn invalid_percent_window_is_enforced() -> Result<(), String> {
    let limits = RunLimits::default();
    for (value, ppm) in [("0.01", 100), ("1", 10_000), ("0.5", 5_000), ("0.0125", 125)] {
        let mut raw = raw_input();
        raw.invalid_percent = value.to_owned();
        let config = validate_run_config(&raw, &limits)
            .map_err(|err| format!("'{}' should be accepted: {}", value, err))?;
        if config.invalid_ratio().ppm() != ppm {
            return Err(format!(
                "Expected {} ppm for '{}', got {}",
                ppm,
                value,
                config.invalid_ratio().ppm()
            ));
        }
    }
    for value in ["0", "0.009", "1.01", "-0.5", "NaN", "0.00001", "x"] {
        let mut raw = raw_input();
        raw.invalid_percent = value.to_owned();
        expect_field(validate_run_config(&raw, &limits), RunField::InvalidPercent)?;
    }
    Ok(())
}

#[test]
fn malformed_body_is_rejected_even_for_get() -> Result<(), String> {
    let mut raw = raw_input();
    raw.method = "GET".to_owned();
    raw.body = "{not json".to_owned();
    match validate_run_config(&raw, &RunLimits::default()) {
        Err(RunConfigError::MalformedBody(_)) => Ok(()),
        other => Err(format!("Expected MalformedBody, got {:?}", other)),
    }
}

#[test]
fn blank_body_means_no_body_and_scalars_are_kept() -> Result<(), String> {
    let mut raw = raw_input();
    raw.body = "  \n ".to_owned();
    let config = validate_run_config(&raw, &RunLimits::default())
        .map_err(|err| format!("validation failed: {}", err))?;
    if config.body().is_some() {
        return Err("Blank body should produce no template".to_owned());
    }

    raw.body = "42".to_owned();
    let config = validate_run_config(&raw, &RunLimits::default())
        .map_err(|err| format!("validation failed: {}", err))?;
    match config.body() {
        Some(BodyTemplate::Scalar(value)) if value == &serde_json::json!(42) => Ok(()),
        other => Err(format!("Unexpected body: {:?}", other)),
    }
}

#[test]
fn path_error_wins_over_later_fields() -> Result<(), String> {
    let raw = RawRunInput {
        path: "nope".to_owned(),
        method: "TRACE".to_owned(),
        body: "{bad".to_owned(),
        concurrency: "0".to_owned(),
        duration: "1".to_owned(),
        invalid_percent: "50".to_owned(),
    };
    expect_field(validate_run_config(&raw, &RunLimits::default()), RunField::Path)
}

#[test]
fn inverted_limits_are_rejected() -> Result<(), String> {
    let result = RunLimits::new(
        20_000,
        10_000,
        InvalidRatio::from_ppm(100),
        InvalidRatio::from_ppm(200),
    );
    match result {
        Err(ValidationError::LimitsInverted {
            field: RunField::Duration,
        }) => Ok(()),
        other => Err(format!("Unexpected result: {:?}", other)),
    }
}

#[test]
fn percent_text_keeps_two_decimals() -> Result<(), String> {
    for (ppm, expected) in [(1_000, "0.10"), (100, "0.01"), (10_000, "1.00"), (150, "0.015")] {
        let text = InvalidRatio::from_ppm(ppm).percent_text();
        if text != expected {
            return Err(format!("Expected {} for {} ppm, got {}", expected, ppm, text));
        }
    }
    Ok(())
}

#[test]
fn decimal_and_duration_parsers_reject_garbage() -> Result<(), String> {
    if parse_decimal(".").is_some() || parse_decimal("1.2.3").is_some() {
        return Err("Malformed decimals should not parse".to_owned());
    }
    if parse_percent("0.12345").is_some() {
        return Err("Percent beyond 4 decimals should not parse".to_owned());
    }
    let seconds = parse_duration_value("30", DefaultUnit::Seconds)
        .map_err(|err| format!("parse failed: {}", err))?;
    if seconds != Duration::from_secs(30) {
        return Err(format!("Unexpected duration: {:?}", seconds));
    }
    match parse_duration_value("", DefaultUnit::Millis) {
        Err(ValidationError::DurationEmpty) => Ok(()),
        other => Err(format!("Unexpected result: {:?}", other)),
    }
}
