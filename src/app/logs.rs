use tokio::io::{AsyncWriteExt, BufWriter};

use crate::metrics::TaskOutcome;

/// Writes the communication log, one line per completed task.
///
/// # Errors
///
/// Returns an error when the file cannot be created or written.
pub(crate) async fn write_log_file(path: &str, log: &[TaskOutcome]) -> std::io::Result<()> {
    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);
    for outcome in log {
        let line = format!("{}\n", outcome);
        writer.write_all(line.as_bytes()).await?;
    }
    writer.flush().await?;
    Ok(())
}
