//! awsmap - map and inventory AWS resources from the command line.
//!
//! Responsibilities:
//! - Parse command-line arguments and merge them over `AWSMAP_*`
//!   environment configuration.
//! - Resolve credentials, drive a scan through `awsmap-scanner`, and export
//!   the result in the requested format.
//!
//! Does NOT handle:
//! - Orchestration logic (see `crates/scanner`) or provider calls (see
//!   `crates/collectors`).
//!
//! Invariants:
//! - `load_dotenv()` runs BEFORE configuration loading so `.env` values are
//!   visible to the environment merge.
//! - Progress and status output goes to stderr; stdout carries only report
//!   content (table format without `--output`).

mod args;
mod cancellation;
mod commands;
mod error;
mod formatters;
mod progress;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::Cli;
use awsmap_config::ConfigLoader;
use cancellation::{is_cancelled_error, print_cancelled_message};
use error::{ExitCode, ExitCodeExt};

#[tokio::main]
async fn main() {
    // Load .env before reading any configuration from the environment.
    let loader = ConfigLoader::new();
    if let Err(e) = loader.load_dotenv() {
        eprintln!("Failed to load environment: {e}");
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match cli.build_config(loader) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(ExitCode::ValidationError.as_i32());
        }
    };

    let cancel = awsmap_scanner::CancellationToken::new();
    let cancel_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for Ctrl+C: {e}");
            return;
        }
        cancel_signal.cancel();
    });

    let result = if cli.list_services {
        commands::list_services::run(&config).await
    } else {
        commands::scan::run(&config, &cancel).await
    };

    let exit_code = match result {
        Ok(()) => ExitCode::Success,
        Err(e) if is_cancelled_error(&e) => {
            print_cancelled_message();
            ExitCode::Interrupted
        }
        Err(e) => {
            eprintln!("{e:#}");
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}
