//! # validate-bug-report entry point
//!
//! Parses command-line arguments, initialises tracing, and runs the
//! validate command.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bugreport_cli::validate::{run_validate, ValidateArgs};
use bugreport_cli::verbosity_filter;

/// Validate Bug Report File.
///
/// Checks a bug report questionnaire file against its versioned schema
/// and optionally prints a human-readable preview.
#[derive(Parser, Debug)]
#[command(name = "validate-bug-report", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    validate: ValidateArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity_filter(cli.verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(file = %cli.validate.file.display(), "validate-bug-report starting");

    match run_validate(&cli.validate) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
