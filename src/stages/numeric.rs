//! Non-negativity validation for numeric columns.

use super::{CleaningStage, StageOutput, filter_rows, resolve_columns};
use crate::config::CleaningConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::report::{CleaningAction, StageKind};
use polars::prelude::*;

/// Removes records with a strictly negative value in any configured column.
///
/// Columns are checked in order and removals accumulate: a record dropped
/// for the first column is not counted again for the second.
pub struct NumericValidator {
    columns: Vec<String>,
}

impl NumericValidator {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn from_config(config: &CleaningConfig) -> Self {
        Self::new(config.numeric_non_negative_columns.clone())
    }
}

impl CleaningStage for NumericValidator {
    fn stage(&self) -> StageKind {
        StageKind::ValidateNumeric
    }

    fn description(&self) -> String {
        format!("Reject negative values in {} numeric columns", self.columns.len())
    }

    fn apply(&self, mut dataset: Dataset) -> Result<StageOutput> {
        let mut actions = Vec::new();

        for name in resolve_columns(&dataset, &self.columns) {
            let removed = if dataset.frame().column(name)?.dtype() == &DataType::Float64 {
                let negative = col(name).lt(lit(0.0)).fill_null(false);
                let (next, removed) = filter_rows(dataset, negative.not())?;
                dataset = next;
                removed
            } else {
                tracing::warn!("Column '{name}' is not numeric, nothing to check");
                0
            };
            let description =
                format!("Removed {removed} invalid rows from '{name}' where values were negative");
            tracing::info!("{description}");
            actions.push(CleaningAction::new(StageKind::ValidateNumeric, description, removed));
        }

        Ok(StageOutput::new(dataset, actions))
    }
}
