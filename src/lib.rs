//! # Opportunity Cleaner
//!
//! Batch cleaning for tabular opportunity records. A raw dataset goes through
//! a fixed sequence of stages and comes out de-duplicated, gap-free and
//! validated, together with a [`report::CleaningReport`] listing every
//! corrective action and how many records it touched.
//!
//! ## Quick Start
//!
//! ```no_run
//! use opportunity_cleaner::config::CleaningConfig;
//! use opportunity_cleaner::pipeline::run_files;
//!
//! let run = run_files(
//!     &CleaningConfig::default(),
//!     "Opportunity Wise Data.csv",
//!     "cleaned_data.csv",
//!     "cleaning_log.txt",
//! )?;
//! println!("{}", run.summary());
//! # Ok::<(), opportunity_cleaner::error::CleanerError>(())
//! ```
//!
//! ## Modules
//!
//! - [`config`]: which columns get which treatment
//! - [`dataset`]: the in-memory table model and CSV I/O
//! - [`stages`]: the six cleaning stages
//! - [`pipeline`]: stage orchestration, schema validation and file execution
//! - [`report`]: the cleaning report and its text rendering
//! - [`profile`]: per-column statistics
//! - [`logging`]: console and rolling file logging
//! - [`error`]: error types

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod profile;
pub mod report;
pub mod stages;
