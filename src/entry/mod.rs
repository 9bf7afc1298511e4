use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches};
use tokio::sync::broadcast;
use tracing::{error, info};

use crate::app::{render_summary, setup_progress_indicator, write_log_file, write_summary};
use crate::args::RunArgs;
use crate::config::{apply_config, load_body_file, load_config, resolve_limits};
use crate::domain::{RunLimits, validate_run_config};
use crate::error::{AppError, AppResult};
use crate::http::{ExecutorSettings, ReqwestExecutor, RngSeed};
use crate::logger::init_logging;
use crate::runner::LoadRun;
use crate::shutdown::stop_run_on_shutdown;
use crate::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};

/// Default config filenames checked when no CLI args are provided.
const DEFAULT_CONFIG_FILES: [&str; 2] = ["massrun.toml", "massrun.json"];

/// Runs the CLI: parse arguments, merge config, run, report.
///
/// # Errors
///
/// Returns an error when arguments, config, or run parameters are invalid,
/// or the summary cannot be written.
pub fn run() -> AppResult<()> {
    let Some((args, limits)) = parse_args()? else {
        return Ok(());
    };

    init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args, limits))
}

fn parse_args() -> AppResult<Option<(RunArgs, RunLimits)>> {
    let mut cmd = RunArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let mut args = RunArgs::from_arg_matches(&matches)?;

    let config = load_config(args.config.as_deref())?;
    if let Some(config) = config.as_ref() {
        apply_config(&mut args, &matches, config)?;
    }
    load_body_file(&mut args)?;
    let limits = resolve_limits(config.as_ref())?;

    Ok(Some((args, limits)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config() && std::env::var_os("MASSRUN_API_BASE").is_none()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(args: RunArgs, limits: RunLimits) -> AppResult<()> {
    let config = validate_run_config(&args.raw_input(), &limits).map_err(|err| {
        if let Some(field) = err.field() {
            error!("Rejected {}: {}", field, err);
        }
        AppError::from(err)
    })?;

    let executor = ReqwestExecutor::new(&ExecutorSettings {
        base_url: args.base_url.clone(),
        request_timeout: args.request_timeout,
        connect_timeout: args.connect_timeout,
    })?;
    let seed = args.seed.map_or(RngSeed::Entropy, RngSeed::Fixed);

    let (shutdown_tx, _) = shutdown_channel();
    let (done_tx, _) = broadcast::channel::<()>(1);

    let run = LoadRun::new(config, Arc::new(executor))
        .with_headers(args.headers.clone())
        .with_seed(seed);
    let state = run.state();

    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);
    let stop_handle = stop_run_on_shutdown(&shutdown_tx, Arc::clone(&state));
    let progress_handle = if args.no_progress {
        None
    } else {
        Some(setup_progress_indicator(
            Arc::clone(&state),
            args.no_color,
            &done_tx,
        ))
    };

    let summary = run.run().await;

    signal_handle.abort();
    stop_handle.abort();
    drop(done_tx.send(()));
    if let Some(handle) = progress_handle {
        handle.await?;
    }

    if let Some(path) = args.log_file.as_deref() {
        let log = state.log();
        write_log_file(path, &log).await?;
        info!("Wrote {} log lines to {}", log.len(), path);
    }

    let rendered = render_summary(&summary, args.output_format)?;
    write_summary(&rendered, args.output.as_deref()).await?;
    Ok(())
}
