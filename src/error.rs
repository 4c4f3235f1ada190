//! Centralized error handling for the cleaning library.
//!
//! Library code returns [`Result`], an alias over [`CleanerError`]. The binary
//! works in `anyhow` and converts at the boundary.
//!
//! ```
//! use opportunity_cleaner::error::CleanerError;
//!
//! fn describe(err: &CleanerError) -> &'static str {
//!     match err {
//!         CleanerError::Io(_) => "i/o",
//!         CleanerError::Schema(_) => "schema",
//!         _ => "other",
//!     }
//! }
//! ```
//!
//! The [`ResultExt`] trait adds `.context()` to any `Result` whose error
//! converts into a [`CleanerError`]:
//!
//! ```no_run
//! use opportunity_cleaner::error::ResultExt as _;
//!
//! fn load() -> opportunity_cleaner::error::Result<String> {
//!     std::fs::read_to_string("opportunities.csv").context("Failed to read dataset")
//! }
//! ```

use std::fmt;

/// Main error type for cleaning operations.
#[derive(Debug)]
pub enum CleanerError {
    /// I/O errors (file operations)
    Io(std::io::Error),

    /// Tabular read/write errors (Polars, CSV parsing)
    DataProcessing(String),

    /// Invalid or unsupported configuration
    Config(String),

    /// The dataset does not match the configured schema
    Schema(String),

    /// File not found or invalid path
    InvalidPath(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for CleanerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Schema(msg) => write!(f, "Schema error: {msg}"),
            Self::InvalidPath(msg) => write!(f, "Invalid path: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CleanerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CleanerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for CleanerError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<serde_json::Error> for CleanerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for CleanerError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleanerError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<CleanerError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: CleanerError = e.into();
            CleanerError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: CleanerError = e.into();
            CleanerError::Other(format!("{}: {}", f(), err))
        })
    }
}
