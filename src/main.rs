//! procinspect - look into a running Windows process
//!
//! Prints the command line a process was started with (from WMI), looks up
//! a loaded module by exact name, or lists loaded modules.
//!
//! Examples:
//! - `procinspect cmdline 1234`
//! - `procinspect module self ntdll.dll`
//! - `procinspect modules 1234 --contains d3d -i -o csv`

mod app;
mod ui;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use app::cli::Cli;
use app::Outcome;
use process_inspector::constants::{APP_NAME, LOG_LEVELS};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    tracing::debug!(app = APP_NAME, command = ?cli.command, "starting");

    match app::run_native(&cli, io::stdout().lock()) {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::NotFound) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = LOG_LEVELS[usize::from(verbose).min(LOG_LEVELS.len() - 1)];
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
