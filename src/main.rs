//! Command line entry point for `opportunity-cleaner`.
//!
//! ```bash
//! opportunity-cleaner clean --input "Opportunity Wise Data.csv"
//! opportunity-cleaner inspect --input cleaned_data.csv
//! opportunity-cleaner config --output cleaning.json
//! ```
//!
//! Set `RUST_LOG=debug` to see per-column detail.

#![expect(clippy::print_stdout)]

mod cli;

use anyhow::Result;
use clap::Parser as _;
use opportunity_cleaner::logging;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let log_dir = cli.log_dir.clone().or_else(logging::default_log_dir);
    logging::init(log_dir.clone())?;
    if let Some(dir) = &log_dir {
        tracing::debug!("Writing logs to {}", logging::current_log_path(dir).display());
    }

    cli::run_command(cli.command).inspect_err(|e| tracing::error!("{e:#}"))
}
