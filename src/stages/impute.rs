//! Missing value imputation: median for numeric columns, mode for the rest.

use super::{CleaningStage, StageOutput};
use crate::config::CleaningConfig;
use crate::dataset::{ColumnKind, Dataset, render_series};
use crate::error::Result;
use crate::report::{CleaningAction, StageKind};
use polars::prelude::*;

const COUNT_COLUMN: &str = "__mode_count";

pub struct MissingValueImputer {
    unknown_fill: String,
    empty_numeric_fill: f64,
}

impl MissingValueImputer {
    pub fn new(unknown_fill: impl Into<String>, empty_numeric_fill: f64) -> Self {
        Self {
            unknown_fill: unknown_fill.into(),
            empty_numeric_fill,
        }
    }

    pub fn from_config(config: &CleaningConfig) -> Self {
        Self::new(config.unknown_fill.clone(), config.empty_numeric_fill)
    }

    /// Pick the fill expression for one column and describe the choice.
    fn fill_for(&self, frame: &DataFrame, name: &str, kind: ColumnKind) -> Result<(Expr, String)> {
        let fill = match kind {
            ColumnKind::Numeric => match frame.column(name)?.as_materialized_series().median() {
                Some(m) => (
                    col(name).fill_null(lit(m)),
                    format!("Filled missing values in '{name}' with median value '{m}'"),
                ),
                None => (
                    col(name).fill_null(lit(self.empty_numeric_fill)),
                    format!(
                        "Filled missing values in '{name}' with '{}' (column had no values)",
                        self.empty_numeric_fill
                    ),
                ),
            },
            ColumnKind::Categorical | ColumnKind::Date => match mode(frame, name)? {
                Some(value) => {
                    let shown = render_series(&value)?
                        .into_iter()
                        .next()
                        .flatten()
                        .unwrap_or_default();
                    (
                        col(name).fill_null(lit(value).first()),
                        format!("Filled missing values in '{name}' with '{shown}'"),
                    )
                }
                None => (
                    col(name)
                        .cast(DataType::String)
                        .fill_null(lit(self.unknown_fill.as_str())),
                    format!(
                        "Filled missing values in '{name}' with '{}' (column had no values)",
                        self.unknown_fill
                    ),
                ),
            },
        };
        Ok(fill)
    }
}

impl CleaningStage for MissingValueImputer {
    fn stage(&self) -> StageKind {
        StageKind::Impute
    }

    fn description(&self) -> String {
        "Fill missing values with the column median (numeric) or mode (text)".to_owned()
    }

    fn apply(&self, dataset: Dataset) -> Result<StageOutput> {
        let mut fills = Vec::new();
        let mut actions = Vec::new();

        for column in dataset.columns() {
            let missing = dataset.missing_count(&column.name);
            if missing == 0 {
                continue;
            }

            let (fill, description) = self.fill_for(dataset.frame(), &column.name, column.kind)?;
            tracing::info!("{description} ({missing} values)");
            fills.push(fill.alias(column.name.as_str()));
            actions.push(CleaningAction::new(StageKind::Impute, description, missing));
        }

        if fills.is_empty() {
            return Ok(StageOutput::new(dataset, actions));
        }
        let frame = dataset.frame().clone().lazy().with_columns(fills).collect()?;
        Ok(StageOutput::new(dataset.with_frame(frame), actions))
    }
}

/// Most frequent non-missing value of column `name`, as a one-row series.
/// Ties go to the value seen first.
///
/// # Errors
///
/// Returns an error if the column does not exist.
pub fn mode(frame: &DataFrame, name: &str) -> Result<Option<Series>> {
    let counts = frame
        .clone()
        .lazy()
        .select([col(name)])
        .filter(col(name).is_not_null())
        .group_by_stable([col(name)])
        .agg([len().alias(COUNT_COLUMN)])
        .sort_by_exprs(
            [col(COUNT_COLUMN)],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .limit(1)
        .collect()?;

    if counts.height() == 0 {
        return Ok(None);
    }
    Ok(Some(counts.column(name)?.as_materialized_series().clone()))
}
