//! Column profiling: structure, missing counts and summary statistics.
//!
//! Statistics come straight from Polars over each column of the dataset's
//! frame.

use crate::dataset::{ColumnKind, Dataset};
use crate::error::Result;
use polars::prelude::*;
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub negative_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub count: usize,
    pub missing: usize,
    pub distinct: usize,
    pub numeric: Option<NumericStats>,
}

impl ColumnProfile {
    pub fn missing_pct(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.missing as f64 / self.count as f64) * 100.0
        }
    }
}

/// Profile every column of `dataset`, in column order.
///
/// # Errors
///
/// Returns an error if Polars cannot compute a column's statistics.
pub fn profile_dataset(dataset: &Dataset) -> Result<Vec<ColumnProfile>> {
    dataset
        .columns()
        .iter()
        .map(|column| {
            let series = dataset.frame().column(&column.name)?.as_materialized_series();
            let numeric = if column.kind == ColumnKind::Numeric {
                numeric_stats(series)?
            } else {
                None
            };

            Ok(ColumnProfile {
                name: column.name.clone(),
                kind: column.kind,
                count: series.len(),
                missing: series.null_count(),
                distinct: series.drop_nulls().n_unique()?,
                numeric,
            })
        })
        .collect()
}

fn numeric_stats(series: &Series) -> Result<Option<NumericStats>> {
    let values = series.cast(&DataType::Float64)?;
    let ca = values.f64()?;

    let (Some(min), Some(max), Some(mean), Some(median)) =
        (ca.min(), ca.max(), ca.mean(), ca.median())
    else {
        return Ok(None);
    };

    Ok(Some(NumericStats {
        min,
        max,
        mean,
        median,
        negative_count: ca.into_iter().flatten().filter(|&v| v < 0.0).count(),
    }))
}

/// Missing values per column, for before/after logging.
pub fn missing_counts(dataset: &Dataset) -> Vec<(String, usize)> {
    dataset
        .columns()
        .iter()
        .map(|column| (column.name.clone(), dataset.missing_count(&column.name)))
        .collect()
}

/// Render profiles as a fixed-width text table.
pub fn render_profile_table(profiles: &[ColumnProfile]) -> String {
    let width = profiles
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Column".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<width$}  {:<11}  {:>7}  {:>12}  {:>8}  {:>10}  {:>10}  {:>10}  {:>10}",
        "Column", "Kind", "Rows", "Missing", "Distinct", "Min", "Max", "Mean", "Median"
    );
    for profile in profiles {
        let missing = format!("{} ({:.1}%)", profile.missing, profile.missing_pct());
        let _ = write!(
            out,
            "{:<width$}  {:<11}  {:>7}  {:>12}  {:>8}",
            profile.name,
            profile.kind.as_str(),
            profile.count,
            missing,
            profile.distinct
        );
        match &profile.numeric {
            Some(stats) => {
                let _ = writeln!(
                    out,
                    "  {:>10.2}  {:>10.2}  {:>10.2}  {:>10.2}",
                    stats.min, stats.max, stats.mean, stats.median
                );
            }
            None => out.push('\n'),
        }
    }
    out
}
