//! File-level execution.
//!
//! Loads a CSV, runs the [`CleaningPipeline`], then writes the cleaned CSV
//! and the plain-text cleaning log.

use super::CleaningPipeline;
use crate::config::CleaningConfig;
use crate::dataset::io::{load_dataset, save_dataset};
use crate::error::{Result, ResultExt as _};
use crate::profile::missing_counts;
use crate::report::CleaningReport;
use std::path::{Path, PathBuf};

/// Outcome of one file run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub report: CleaningReport,

    pub input_path: PathBuf,

    /// Where the cleaned CSV was written
    pub output_path: PathBuf,

    /// Where the cleaning log was written
    pub log_path: PathBuf,

    /// Time taken for execution
    pub duration: std::time::Duration,
}

impl RunSummary {
    /// Create a summary message
    pub fn summary(&self) -> String {
        format!(
            "{} in {:.2}s, wrote {} and {}",
            self.report.summary(),
            self.duration.as_secs_f64(),
            self.output_path.display(),
            self.log_path.display()
        )
    }
}

/// Clean `input` and write the results to `output` and `log_path`.
///
/// Nothing is written when loading or schema validation fails.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the input cannot be
/// loaded or lacks configured columns, or an output cannot be written.
pub fn run_files(
    config: &CleaningConfig,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    log_path: impl AsRef<Path>,
) -> Result<RunSummary> {
    let start = std::time::Instant::now();
    let (input, output, log_path) = (input.as_ref(), output.as_ref(), log_path.as_ref());

    let pipeline = CleaningPipeline::new(config.clone())?;
    let raw = load_dataset(input, config)?;
    log_missing("before cleaning", &missing_counts(&raw));

    let (cleaned, report) = pipeline.run(raw)?;
    log_missing("after cleaning", &missing_counts(&cleaned));

    save_dataset(&cleaned, output)?;
    write_log(&report, log_path)?;

    let summary = RunSummary {
        report,
        input_path: input.to_path_buf(),
        output_path: output.to_path_buf(),
        log_path: log_path.to_path_buf(),
        duration: start.elapsed(),
    };
    tracing::info!("{}", summary.summary());
    Ok(summary)
}

/// Write the rendered cleaning log.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_log(report: &CleaningReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    create_parent(path)?;
    std::fs::write(path, report.render_log())
        .with_context(|| format!("Failed to write cleaning log {}", path.display()))?;
    tracing::info!("Cleaning log saved to {}", path.display());
    Ok(())
}

/// Write the report as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_report_json(report: &CleaningReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    create_parent(path)?;
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report {}", path.display()))?;
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

fn log_missing(when: &str, counts: &[(String, usize)]) {
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    tracing::info!("Missing values {when}: {total}");
    for (column, missing) in counts.iter().filter(|(_, n)| *n > 0) {
        tracing::debug!("  {column}: {missing}");
    }
}
