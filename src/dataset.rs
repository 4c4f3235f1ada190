//! In-memory table model shared by every cleaning stage.
//!
//! A [`Dataset`] is a Polars [`DataFrame`] plus the [`ColumnKind`] the
//! configuration assigns to each of its columns. Numeric columns hold
//! `Float64`, categorical columns hold `String`, and date columns hold
//! `String` until the standardizer parses them into `Datetime`.

pub mod io;

use crate::error::{CleanerError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Canonical rendering for parsed dates.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Resolution of parsed date columns.
pub const DATE_TIME_UNIT: TimeUnit = TimeUnit::Milliseconds;

/// How a column's values are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Date,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "Numeric",
            Self::Categorical => "Categorical",
            Self::Date => "Date",
        }
    }

    /// Polars type of a freshly loaded column of this kind
    pub fn raw_dtype(&self) -> DataType {
        match self {
            Self::Numeric => DataType::Float64,
            Self::Categorical | Self::Date => DataType::String,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    columns: Vec<Column>,
}

impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns && self.frame.equals_missing(&other.frame)
    }
}

impl Dataset {
    /// Create an empty dataset over `columns`.
    ///
    /// # Errors
    ///
    /// Returns an error if two columns share a name.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let frame_columns = columns
            .iter()
            .map(|c| Series::new_empty(c.name.as_str().into(), &c.kind.raw_dtype()).into_column())
            .collect();
        Ok(Self {
            frame: DataFrame::new(frame_columns)?,
            columns,
        })
    }

    /// Build a dataset from raw text cells. Empty and absent cells are missing.
    ///
    /// # Errors
    ///
    /// Returns a schema error if any row's width differs from the column count.
    pub fn from_raw_rows<S: AsRef<str>>(
        columns: Vec<Column>,
        rows: &[Vec<Option<S>>],
    ) -> Result<Self> {
        if let Some(row) = rows.iter().find(|row| row.len() != columns.len()) {
            return Err(row_width_error(row.len(), columns.len()));
        }

        let frame_columns = columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let cells: Vec<Option<&str>> = rows
                    .iter()
                    .map(|row| {
                        row.get(index)
                            .and_then(|cell| cell.as_ref())
                            .map(|cell| cell.as_ref())
                            .filter(|cell| !cell.is_empty())
                    })
                    .collect();
                Series::new(column.name.as_str().into(), cells).into_column()
            })
            .collect();

        Self::from_text_frame(DataFrame::new(frame_columns)?, columns)
    }

    /// Type an all-text frame: numeric columns are trimmed and cast to
    /// `Float64`, every other column stays text as read.
    ///
    /// Numeric cells that do not parse, NaN included, become missing with a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric column is not text.
    pub fn from_text_frame(frame: DataFrame, columns: Vec<Column>) -> Result<Self> {
        let numeric: Vec<&str> = columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Numeric)
            .map(|c| c.name.as_str())
            .collect();
        if numeric.is_empty() {
            return Ok(Self { frame, columns });
        }

        let checks: Vec<Expr> = numeric
            .iter()
            .map(|name| {
                col(*name)
                    .str()
                    .strip_chars(lit(NULL))
                    .neq(lit(""))
                    .and(parse_numeric(name).is_null())
                    .sum()
                    .cast(DataType::UInt64)
                    .alias(*name)
            })
            .collect();
        let unparsed = frame.clone().lazy().select(checks).collect()?;
        for name in &numeric {
            let count = unparsed
                .column(name)?
                .as_materialized_series()
                .u64()?
                .get(0)
                .unwrap_or(0);
            if count > 0 {
                tracing::warn!("{count} non-numeric values in '{name}' loaded as missing");
            }
        }

        let typed: Vec<Expr> = numeric
            .iter()
            .map(|name| parse_numeric(name).alias(*name))
            .collect();
        let frame = frame.lazy().with_columns(typed).collect()?;
        Ok(Self { frame, columns })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn missing_count(&self, name: &str) -> usize {
        self.frame.column(name).map_or(0, |c| c.null_count())
    }

    /// One column's values rendered as text, `None` for missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the column does not exist.
    pub fn column_text(&self, name: &str) -> Result<Vec<Option<String>>> {
        render_series(self.frame.column(name)?.as_materialized_series())
    }

    /// Replace the frame, keeping the column kinds.
    pub(crate) fn with_frame(self, frame: DataFrame) -> Self {
        Self {
            frame,
            columns: self.columns,
        }
    }

    pub(crate) fn frame_mut(&mut self) -> &mut DataFrame {
        &mut self.frame
    }
}

fn parse_numeric(name: &str) -> Expr {
    col(name)
        .str()
        .strip_chars(lit(NULL))
        .cast(DataType::Float64)
        .fill_nan(lit(NULL))
}

/// Render a series as text. Numbers use their shortest form, dates the
/// canonical format.
///
/// # Errors
///
/// Returns an error if the series cannot be cast to text.
pub fn render_series(series: &Series) -> Result<Vec<Option<String>>> {
    let rendered = match series.dtype() {
        DataType::Float64 => series
            .f64()?
            .into_iter()
            .map(|v| v.map(|n| n.to_string()))
            .collect(),
        DataType::Datetime(_, _) => series
            .datetime()?
            .as_datetime_iter()
            .map(|v| v.map(|d| d.format(CANONICAL_DATE_FORMAT).to_string()))
            .collect(),
        DataType::String => series
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_owned))
            .collect(),
        _ => series
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_owned))
            .collect(),
    };
    Ok(rendered)
}

fn row_width_error(got: usize, expected: usize) -> CleanerError {
    CleanerError::Schema(format!(
        "Row has {got} values but the dataset has {expected} columns"
    ))
}
