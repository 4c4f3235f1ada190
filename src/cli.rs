use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use opportunity_cleaner::config::{CleaningConfig, DEFAULT_LOG_FILE, DEFAULT_OUTPUT_FILE};
use opportunity_cleaner::dataset::io::load_dataset;
use opportunity_cleaner::pipeline::executor::write_report_json;
use opportunity_cleaner::pipeline::run_files;
use opportunity_cleaner::profile::{profile_dataset, render_profile_table};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "opportunity-cleaner",
    about = "Clean opportunity records and write an audit log"
)]
pub struct Cli {
    /// Directory for rolling log files. Defaults to the platform data directory.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a CSV file and write the cleaned data and cleaning log
    Clean {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Cleaned CSV output path
        #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
        output: PathBuf,

        /// Cleaning log output path
        #[arg(short, long, default_value = DEFAULT_LOG_FILE)]
        log: PathBuf,

        /// Also write the cleaning report as JSON
        #[arg(long)]
        report_json: Option<PathBuf>,

        /// Path to a JSON cleaning configuration file
        #[arg(long, env = "OPPORTUNITY_CLEANER_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Print a column profile of a CSV file
    Inspect {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Path to a JSON cleaning configuration file
        #[arg(long, env = "OPPORTUNITY_CLEANER_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Print or write the default configuration
    Config {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Clean {
            input,
            output,
            log,
            report_json,
            config,
        } => handle_clean(&input, &output, &log, report_json.as_deref(), config.as_deref()),
        Commands::Inspect { input, config } => handle_inspect(&input, config.as_deref()),
        Commands::Config { output } => handle_config(output.as_deref()),
    }
}

fn handle_clean(
    input: &Path,
    output: &Path,
    log: &Path,
    report_json: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;

    println!("Cleaning {}...", input.display());
    let run = run_files(&config, input, output, log).context("Cleaning failed")?;

    if let Some(path) = report_json {
        write_report_json(&run.report, path).context("Failed to write JSON report")?;
        println!("Report written to {}", path.display());
    }

    print!("{}", run.report.render_log());
    println!("{}", run.summary());
    Ok(())
}

fn handle_inspect(input: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let dataset = load_dataset(input, &config).context("Failed to load input file")?;

    println!(
        "{}: {} rows, {} columns",
        input.display(),
        dataset.len(),
        dataset.columns().len()
    );
    let profiles = profile_dataset(&dataset).context("Failed to profile input file")?;
    print!("{}", render_profile_table(&profiles));
    Ok(())
}

fn handle_config(output: Option<&Path>) -> Result<()> {
    let config = CleaningConfig::default();
    match output {
        Some(path) => {
            config.to_file(path)?;
            println!("Default configuration written to {}", path.display());
        }
        None => println!("{}", config.to_json()?),
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<CleaningConfig> {
    match path {
        Some(path) => {
            println!("Loading config from {}...", path.display());
            CleaningConfig::from_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))
        }
        None => Ok(CleaningConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_clean_defaults() {
        let cli = Cli::try_parse_from(["opportunity-cleaner", "clean", "--input", "raw.csv"])
            .unwrap_or_else(|e| panic!("parse failed: {e}"));
        assert!(cli.log_dir.is_none());
        match cli.command {
            Commands::Clean {
                input, output, log, ..
            } => {
                assert_eq!(input, PathBuf::from("raw.csv"));
                assert_eq!(output, PathBuf::from(DEFAULT_OUTPUT_FILE));
                assert_eq!(log, PathBuf::from(DEFAULT_LOG_FILE));
            }
            _ => panic!("expected clean"),
        }
    }

    #[test]
    fn test_config_roundtrips_through_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");
        handle_config(Some(&path))?;
        assert_eq!(load_config(Some(&path))?, CleaningConfig::default());
        Ok(())
    }
}
