mod app;
mod args;
mod config;
mod domain;
mod entry;
mod error;
mod http;
mod logger;
mod metrics;
mod runner;
mod shutdown;
mod shutdown_handlers;

use std::process::ExitCode;

fn main() -> ExitCode {
    match entry::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
