//! FileDigest CLI - SHA-256 of large files
//!
//! Hashes a file by streaming or through a memory-mapped background task
//! and prints the elapsed time and the digest.

use clap::Parser;
use filedigest::config::{CliArgs, RunConfig, RunMode, Strategy};
use filedigest::core::Orchestrator;
use filedigest::error::Result;
use filedigest::progress::Ticker;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging on stderr; stdout carries the report
    let default_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Handle result
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    let config = RunConfig::from_cli(&args)?;

    // The streaming path never polls, so it gets no spinner
    let mut ticker = if config.quiet || config.mode == RunMode::Single(Strategy::Streaming) {
        Ticker::hidden()
    } else {
        Ticker::new(format!("Hashing {}", config.path.display()))
    };

    let mut orchestrator = Orchestrator::new();
    let result = orchestrator.execute(&config, |state| ticker.tick(state));
    ticker.finish();

    for report in result? {
        report.print();
    }

    Ok(())
}
