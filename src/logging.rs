//! Logging setup for the command line tool.
//!
//! Logs go to the console and to two daily rolling files:
//!
//! - `opportunity-cleaner.<date>.log`: everything the filter lets through
//! - `error.<date>.log`: warnings and errors only
//!
//! The filter defaults to `info` and honours `RUST_LOG`.
//!
//! ```no_run
//! opportunity_cleaner::logging::init(None)?;
//! tracing::info!("ready");
//! # Ok::<(), opportunity_cleaner::error::CleanerError>(())
//! ```

use crate::error::{CleanerError, Result, ResultExt as _};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

const APP_DIR: &str = "opportunity-cleaner";
const LOG_PREFIX: &str = "opportunity-cleaner";
const MAX_LOG_FILES: usize = 10;

/// Platform log directory
///
/// - Windows: `%APPDATA%/opportunity-cleaner/logs`
/// - macOS: `~/Library/Application Support/opportunity-cleaner/logs`
/// - Linux: `~/.local/share/opportunity-cleaner/logs`
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|base| base.join(APP_DIR).join("logs"))
}

/// Install the global subscriber, writing files under `log_dir` or the
/// platform default.
///
/// # Errors
///
/// Returns an error if no log directory can be determined or created, or an
/// appender cannot be built.
pub fn init(log_dir: Option<PathBuf>) -> Result<()> {
    let log_dir = match log_dir {
        Some(dir) => dir,
        None => default_log_dir().ok_or_else(|| {
            CleanerError::Config("Failed to determine data directory for logs".to_owned())
        })?,
    };
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let all_logs_appender = appender(&log_dir, LOG_PREFIX)?;
    let error_logs_appender = appender(&log_dir, "error")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| CleanerError::Config(format!("Failed to create env filter: {e}")))?;

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let all_logs_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .with_writer(all_logs_appender);

    let error_logs_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .with_writer(error_logs_appender)
        .with_filter(EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(all_logs_layer)
        .with(error_logs_layer)
        .try_init()
        .map_err(|e| CleanerError::Other(format!("Failed to install subscriber: {e}")))?;

    tracing::debug!("Logging initialized, log directory: {}", log_dir.display());
    Ok(())
}

fn appender(log_dir: &Path, prefix: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| CleanerError::Other(format!("Failed to create '{prefix}' log appender: {e}")))
}

/// Path of today's main log file under `log_dir`
pub fn current_log_path(log_dir: &Path) -> PathBuf {
    let today = chrono::Local::now().format("%Y-%m-%d");
    log_dir.join(format!("{LOG_PREFIX}.{today}.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_dir() {
        if let Some(dir) = default_log_dir() {
            assert!(dir.ends_with("opportunity-cleaner/logs") || dir.ends_with("opportunity-cleaner\\logs"));
        }
    }

    #[test]
    fn test_current_log_path_uses_prefix() {
        let path = current_log_path(Path::new("logs"));
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        assert!(name.starts_with("opportunity-cleaner."));
        assert!(name.ends_with(".log"));
    }
}
