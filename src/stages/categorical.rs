//! Domain validation for categorical columns.

use super::{CleaningStage, StageOutput, filter_rows, resolve_columns};
use crate::config::CleaningConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::report::{CleaningAction, StageKind};
use polars::prelude::*;
use std::collections::BTreeSet;

/// Keeps only records whose value is in the valid set, compared exactly.
/// Runs after standardization, so values are already lower-case.
pub struct CategoricalValidator {
    columns: Vec<String>,
    valid_values: BTreeSet<String>,
}

impl CategoricalValidator {
    pub fn new(columns: Vec<String>, valid_values: BTreeSet<String>) -> Self {
        Self {
            columns,
            valid_values,
        }
    }

    pub fn from_config(config: &CleaningConfig) -> Self {
        Self::new(
            config.categorical_normalize_columns.clone(),
            config.valid_categorical_values.clone(),
        )
    }

    /// True where the cell is present and in the valid set
    fn is_valid(&self, name: &str) -> Expr {
        let valid: Vec<&str> = self.valid_values.iter().map(String::as_str).collect();
        col(name)
            .cast(DataType::String)
            .is_in(lit(Series::new("valid".into(), valid)))
            .fill_null(false)
    }
}

impl CleaningStage for CategoricalValidator {
    fn stage(&self) -> StageKind {
        StageKind::ValidateCategorical
    }

    fn description(&self) -> String {
        let valid: Vec<&str> = self.valid_values.iter().map(String::as_str).collect();
        format!("Restrict {} to [{}]", self.columns.join(", "), valid.join(", "))
    }

    fn apply(&self, mut dataset: Dataset) -> Result<StageOutput> {
        let mut actions = Vec::new();

        for name in resolve_columns(&dataset, &self.columns) {
            let (next, removed) = filter_rows(dataset, self.is_valid(name))?;
            dataset = next;
            let description = format!("Removed {removed} rows with invalid '{name}' values");
            tracing::info!("{description}");
            actions.push(CleaningAction::new(
                StageKind::ValidateCategorical,
                description,
                removed,
            ));
        }

        Ok(StageOutput::new(dataset, actions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ColumnKind;
    use crate::stages::FormatStandardizer;
    use crate::stages::test_support::{column, dataset};

    #[test]
    fn test_keeps_only_valid_values() -> Result<()> {
        let data = dataset(
            &[("Gender", ColumnKind::Categorical)],
            &[&["male"], &["xyz"], &["f"], &["unknown"], &[""], &["Male"], &["other"]],
        );

        let out = CategoricalValidator::from_config(&CleaningConfig::default()).apply(data)?;

        assert_eq!(column(&out.dataset, "Gender"), vec!["male", "f", "other"]);
        assert_eq!(out.affected(), 4);
        assert_eq!(
            out.actions.first().map(|a| a.description.as_str()),
            Some("Removed 4 rows with invalid 'Gender' values")
        );
        Ok(())
    }

    #[test]
    fn test_blank_gender_is_rejected_after_standardizing() -> Result<()> {
        let config = CleaningConfig::default();
        let data = dataset(
            &[("Gender", ColumnKind::Categorical), ("Id", ColumnKind::Categorical)],
            &[&["male", "a"], &["   ", "b"]],
        );

        let standardized = FormatStandardizer::from_config(&config).apply(data)?.dataset;
        let out = CategoricalValidator::from_config(&config).apply(standardized)?;

        assert_eq!(column(&out.dataset, "Id"), vec!["a"]);
        assert_eq!(out.affected(), 1);
        Ok(())
    }

    #[test]
    fn test_description_lists_domain() {
        let validator = CategoricalValidator::new(
            vec!["Gender".to_owned()],
            ["m", "f"].into_iter().map(str::to_owned).collect(),
        );
        assert_eq!(validator.description(), "Restrict Gender to [f, m]");
    }
}
