use std::io::{IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use tokio::sync::broadcast;

use crate::metrics::{RunSnapshot, RunState};

/// Redraw interval of the progress line.
const PROGRESS_TICK: Duration = Duration::from_millis(250);
/// Width of the bar between the brackets.
const PROGRESS_BAR_WIDTH: usize = 30;
/// Hundredths of a percent at completion.
const PROGRESS_FULL_X100: u64 = 10_000;

/// Draws the live progress line on stderr until `done_tx` fires.
///
/// Does nothing when stderr is not a terminal.
pub(crate) fn setup_progress_indicator(
    state: Arc<RunState>,
    no_color: bool,
    done_tx: &broadcast::Sender<()>,
) -> tokio::task::JoinHandle<()> {
    let mut done_rx = done_tx.subscribe();
    let style = ProgressStyle::new(PROGRESS_BAR_WIDTH);

    tokio::spawn(async move {
        if !std::io::stderr().is_terminal() {
            return;
        }

        let mut ticker = tokio::time::interval(PROGRESS_TICK);
        let target = state.duration();

        loop {
            tokio::select! {
                _ = done_rx.recv() => {
                    let line = build_progress_line(&style, &state.snapshot(), target, no_color);
                    if render_progress_line(&line, no_color).is_ok() {
                        drop(finish_progress_line());
                    }
                    break;
                }
                _ = ticker.tick() => {
                    let line = build_progress_line(&style, &state.snapshot(), target, no_color);
                    if render_progress_line(&line, no_color).is_err() {
                        break;
                    }
                }
            }
        }
    })
}

fn render_progress_line(line: &[ProgressSegment], no_color: bool) -> Result<(), std::io::Error> {
    let mut out = std::io::stderr();
    queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    for segment in line {
        if no_color {
            queue!(out, Print(&segment.text))?;
        } else if let Some(color) = segment.color {
            queue!(
                out,
                SetForegroundColor(color),
                Print(&segment.text),
                ResetColor
            )?;
        } else {
            queue!(out, Print(&segment.text))?;
        }
    }
    out.flush()?;
    Ok(())
}

fn finish_progress_line() -> Result<(), std::io::Error> {
    let mut out = std::io::stderr();
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

fn build_progress_line(
    style: &ProgressStyle,
    snapshot: &RunSnapshot,
    target: Duration,
    no_color: bool,
) -> Vec<ProgressSegment> {
    let size = style.size.max(1);
    let percent_x100 = snapshot.progress_x100.min(PROGRESS_FULL_X100);

    let size_u64 = u64::try_from(size).unwrap_or(u64::MAX);
    let scaled = percent_x100
        .saturating_mul(size_u64)
        .checked_div(PROGRESS_FULL_X100)
        .unwrap_or(0);
    let complete_size = usize::try_from(scaled).unwrap_or(size).min(size);
    let incomplete_size = size.saturating_sub(complete_size);

    let percent_whole = percent_x100.checked_div(100).unwrap_or(0);
    let percent_frac = percent_x100.checked_rem(100).unwrap_or(0);
    let percent_text = format!(" {}.{:02}%", percent_whole, percent_frac);

    let elapsed_tenths = snapshot.elapsed.as_millis().checked_div(100).unwrap_or(0);
    let secs = elapsed_tenths.checked_div(10).unwrap_or(0);
    let tenths = elapsed_tenths.checked_rem(10).unwrap_or(0);
    let time_text = format!(" | {}.{}s / {}s", secs, tenths, target.as_secs());

    let counts_text = format!(
        " | sent {} ok {} failed {}",
        snapshot.sent, snapshot.success, snapshot.failed
    );

    let progress_bar = format!(
        "{}{}{}{}",
        style.begin,
        style.fill.repeat(complete_size),
        style.empty.repeat(incomplete_size),
        style.end
    );

    if no_color {
        vec![
            ProgressSegment::plain(progress_bar),
            ProgressSegment::plain(percent_text),
            ProgressSegment::plain(time_text),
            ProgressSegment::plain(counts_text),
        ]
    } else {
        let counts_color = if snapshot.failed > 0 {
            Color::Red
        } else {
            Color::Green
        };
        vec![
            ProgressSegment::plain(progress_bar),
            ProgressSegment::colored(percent_text, Color::Cyan),
            ProgressSegment::colored(time_text, Color::Yellow),
            ProgressSegment::colored(counts_text, counts_color),
        ]
    }
}

struct ProgressStyle {
    size: usize,
    begin: String,
    end: String,
    fill: String,
    empty: String,
}

impl ProgressStyle {
    fn new(size: usize) -> Self {
        Self {
            size,
            begin: "[".to_owned(),
            end: "]".to_owned(),
            fill: "#".to_owned(),
            empty: "-".to_owned(),
        }
    }
}

struct ProgressSegment {
    text: String,
    color: Option<Color>,
}

impl ProgressSegment {
    const fn plain(text: String) -> Self {
        Self { text, color: None }
    }

    const fn colored(text: String, color: Color) -> Self {
        Self {
            text,
            color: Some(color),
        }
    }
}
