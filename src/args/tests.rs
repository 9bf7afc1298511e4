use super::*;
use clap::Parser;
use std::time::Duration;

fn parse_test_args<I, T>(args: I) -> Result<RunArgs, String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    RunArgs::try_parse_from(args).map_err(|err| format!("parse failed: {}", err))
}

#[test]
fn parse_args_defaults() -> Result<(), String> {
    let args = parse_test_args(["massrun"])?;

    let checks = [
        (args.path == DEFAULT_PATH, "Unexpected path"),
        (args.method == "POST", "Unexpected method"),
        (args.body == DEFAULT_BODY, "Unexpected body"),
        (args.body_file.is_none(), "Expected body_file to be None"),
        (args.concurrency == "5", "Unexpected concurrency"),
        (args.duration == "60000", "Unexpected duration"),
        (args.invalid_percent == "0.1", "Unexpected invalid_percent"),
        (args.headers.is_empty(), "Expected no headers"),
        (
            args.request_timeout == Duration::from_secs(10),
            "Unexpected request_timeout",
        ),
        (
            args.connect_timeout == Duration::from_secs(5),
            "Unexpected connect_timeout",
        ),
        (args.seed.is_none(), "Expected seed to be None"),
        (
            args.output_format == OutputFormat::Text,
            "Unexpected output_format",
        ),
        (!args.no_progress, "Expected progress enabled"),
        (!args.verbose, "Expected verbose to be false"),
    ];
    for (ok, message) in checks {
        if !ok {
            return Err(message.to_owned());
        }
    }

    if std::env::var_os("MASSRUN_API_BASE").is_none() && args.base_url != DEFAULT_BASE_URL {
        return Err(format!("Unexpected base_url: {}", args.base_url));
    }
    Ok(())
}

#[test]
fn parse_args_keeps_negative_values_for_validation() -> Result<(), String> {
    let args = parse_test_args([
        "massrun",
        "--concurrency",
        "-3",
        "--invalid-percent",
        "-0.5",
        "--duration",
        "-10",
    ])?;
    if args.concurrency != "-3" || args.invalid_percent != "-0.5" || args.duration != "-10" {
        return Err(format!("Unexpected raw values: {:?}", args));
    }
    let raw = args.raw_input();
    if raw.concurrency != "-3" || raw.method != "POST" {
        return Err("raw_input should mirror the arguments".to_owned());
    }
    Ok(())
}

#[test]
fn parse_args_full_run() -> Result<(), String> {
    let args = parse_test_args([
        "massrun",
        "--base-url",
        "http://127.0.0.1:9000",
        "-X",
        "get",
        "-p",
        "/health",
        "-c",
        "12",
        "-t",
        "30s",
        "-i",
        "0.25",
        "-H",
        "X-Trace: on",
        "-H",
        "Authorization: Bearer abc",
        "--request-timeout",
        "750ms",
        "--seed",
        "42",
        "--output-format",
        "json",
        "--log-file",
        "run.log",
        "--no-progress",
    ])?;

    if args.base_url != "http://127.0.0.1:9000" || args.path != "/health" {
        return Err(format!("Unexpected target: {} {}", args.base_url, args.path));
    }
    if args.method != "get" || args.duration != "30s" || args.concurrency != "12" {
        return Err("Run values should stay as given".to_owned());
    }
    if args.headers.len() != 2 {
        return Err(format!("Unexpected headers: {:?}", args.headers));
    }
    if args.request_timeout != Duration::from_millis(750) {
        return Err(format!("Unexpected timeout: {:?}", args.request_timeout));
    }
    if args.seed != Some(42) || args.output_format != OutputFormat::Json {
        return Err("Unexpected seed or output format".to_owned());
    }
    if args.log_file.as_deref() != Some("run.log") || !args.no_progress {
        return Err("Unexpected output flags".to_owned());
    }
    Ok(())
}

#[test]
fn body_and_body_file_conflict() -> Result<(), String> {
    let result = parse_test_args(["massrun", "--body", "{}", "--body-file", "body.json"]);
    if result.is_ok() {
        return Err("Expected --body and --body-file to conflict".to_owned());
    }
    Ok(())
}

#[test]
fn parse_header_valid() -> Result<(), String> {
    let (key, value) = parse_header("Content-Type: application/json")
        .map_err(|err| format!("Expected Ok, got Err: {}", err))?;
    if key != "Content-Type" {
        return Err(format!("Unexpected key: {}", key));
    }
    if value != "application/json" {
        return Err(format!("Unexpected value: {}", value));
    }
    Ok(())
}

#[test]
fn parse_header_invalid() -> Result<(), String> {
    for header in ["MissingDelimiter", "Bad Name: value", ": empty-name"] {
        if parse_header(header).is_ok() {
            return Err(format!("Expected Err for header '{}'", header));
        }
    }
    Ok(())
}

#[test]
fn parse_duration_arg_defaults_to_seconds() -> Result<(), String> {
    let cases = [
        ("5", Duration::from_secs(5)),
        ("250ms", Duration::from_millis(250)),
        ("2m", Duration::from_secs(120)),
    ];
    for (text, expected) in cases {
        let parsed =
            parse_duration_arg(text).map_err(|err| format!("'{}' rejected: {}", text, err))?;
        if parsed != expected {
            return Err(format!("'{}' parsed as {:?}", text, parsed));
        }
    }
    for text in ["0", "0ms", "", "10x", "fast"] {
        if parse_duration_arg(text).is_ok() {
            return Err(format!("Expected '{}' to be rejected", text));
        }
    }
    Ok(())
}
