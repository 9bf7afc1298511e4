use tokio::io::{AsyncWriteExt, BufWriter};

use crate::args::OutputFormat;
use crate::metrics::RunSummary;

/// Scale of the realized invalid share, hundredths of a percent.
const PERCENT_X100_SCALE: u64 = 10_000;
const PERCENT_DIVISOR: u64 = 100;
const MS_PER_SEC: u64 = 1_000;

pub(crate) fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let realized_x100 = u128::from(summary.invalid_targeted)
        .saturating_mul(u128::from(PERCENT_X100_SCALE))
        .checked_div(u128::from(summary.count))
        .map_or(0, |value| u64::try_from(value).unwrap_or(u64::MAX));
    let secs = summary.duration_ms.checked_div(MS_PER_SEC).unwrap_or(0);
    let millis = summary.duration_ms.checked_rem(MS_PER_SEC).unwrap_or(0);

    vec![
        format!("Target: {} {}{}", summary.method, summary.api_base, summary.path),
        format!("Requests: {}", summary.count),
        format!("Successful: {}", summary.success),
        format!("Failed: {}", summary.failed),
        format!(
            "Invalid targets: {} ({}.{:02}% realized, {}% configured)",
            summary.invalid_targeted,
            realized_x100.checked_div(PERCENT_DIVISOR).unwrap_or(0),
            realized_x100.checked_rem(PERCENT_DIVISOR).unwrap_or(0),
            summary.invalid_percent
        ),
        format!("Concurrency: {}", summary.concurrency),
        format!("Duration: {}.{:03}s", secs, millis),
        format!(
            "Stopped early: {}",
            if summary.stopped { "yes" } else { "no" }
        ),
    ]
}

/// Renders the summary in the requested format, newline terminated.
///
/// # Errors
///
/// Returns an error when JSON encoding fails.
pub(crate) fn render_summary(
    summary: &RunSummary,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => {
            let mut text = summary_lines(summary).join("\n");
            text.push('\n');
            Ok(text)
        }
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(summary)?;
            text.push('\n');
            Ok(text)
        }
    }
}

/// Writes the rendered summary to `path`, or to stdout when `path` is `None`.
///
/// # Errors
///
/// Returns an error when the destination cannot be written.
pub(crate) async fn write_summary(rendered: &str, path: Option<&str>) -> std::io::Result<()> {
    if let Some(path) = path {
        let file = tokio::fs::File::create(path).await?;
        let mut writer = BufWriter::new(file);
        writer.write_all(rendered.as_bytes()).await?;
        writer.flush().await?;
    } else {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(rendered.as_bytes()).await?;
        stdout.flush().await?;
    }
    Ok(())
}
