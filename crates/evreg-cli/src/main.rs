//! # evreg CLI entry point
//!
//! Parses command-line arguments and dispatches to the evidence
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use evreg_cli::evidence::{run_evidence, EvidenceCommand};
use evreg_cli::DEFAULT_STORE;

/// Evidence registry CLI.
///
/// Registers evidence by content hash in a local JSON store, lets the
/// submitter amend description and url, and verifies files against the
/// recorded hash.
#[derive(Parser, Debug)]
#[command(name = "evreg", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Registry snapshot file. Created on first write.
    #[arg(long, global = true, default_value = DEFAULT_STORE)]
    store: PathBuf,

    #[command(subcommand)]
    command: EvidenceCommand,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(store = %cli.store.display(), "evreg starting");

    match run_evidence(&cli.command, &cli.store) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
