//! Cross-field date ordering checks.

use super::{CleaningStage, StageOutput, filter_rows};
use crate::config::{CleaningConfig, RelationshipCheck};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::report::{CleaningAction, StageKind};
use polars::prelude::*;

/// Removes records whose `later` date precedes their `earlier` date.
///
/// A record is only judged when both cells hold parsed dates; a missing or
/// unparsed date on either side passes the check.
pub struct RelationshipValidator {
    checks: Vec<RelationshipCheck>,
}

impl RelationshipValidator {
    pub fn new(checks: Vec<RelationshipCheck>) -> Self {
        Self { checks }
    }

    pub fn from_config(config: &CleaningConfig) -> Self {
        Self::new(config.relationship_checks.clone())
    }
}

fn is_parsed_date(dataset: &Dataset, name: &str) -> bool {
    dataset
        .frame()
        .column(name)
        .is_ok_and(|c| matches!(c.dtype(), DataType::Datetime(_, _)))
}

impl CleaningStage for RelationshipValidator {
    fn stage(&self) -> StageKind {
        StageKind::ValidateRelationships
    }

    fn description(&self) -> String {
        format!("Check {} date ordering constraints", self.checks.len())
    }

    fn apply(&self, mut dataset: Dataset) -> Result<StageOutput> {
        let mut actions = Vec::new();

        for check in &self.checks {
            if dataset.column(&check.later).is_none() || dataset.column(&check.earlier).is_none() {
                tracing::warn!(
                    "Skipping check '{}' >= '{}': column not present",
                    check.later,
                    check.earlier
                );
                continue;
            }

            let removed = if is_parsed_date(&dataset, &check.later)
                && is_parsed_date(&dataset, &check.earlier)
            {
                let violates = col(check.later.as_str())
                    .lt(col(check.earlier.as_str()))
                    .fill_null(false);
                let (next, removed) = filter_rows(dataset, violates.not())?;
                dataset = next;
                removed
            } else {
                0
            };

            let description = format!(
                "Removed {removed} rows where '{}' was earlier than '{}'",
                check.later, check.earlier
            );
            tracing::info!("{description}");
            actions.push(CleaningAction::new(
                StageKind::ValidateRelationships,
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
    use crate::stages::test_support::{column, dataset, parsed};

    fn headers() -> [(&'static str, ColumnKind); 3] {
        [
            ("Opportunity End Date", ColumnKind::Date),
            ("Opportunity Start Date", ColumnKind::Date),
            ("Id", ColumnKind::Categorical),
        ]
    }

    #[test]
    fn test_removes_only_present_violations() -> Result<()> {
        let data = parsed(
            &headers(),
            &[
                &["2024-02-01", "2024-01-01", "ok"],
                &["2024-01-01", "2024-02-01", "bad"],
                &["2024-01-01", "2024-01-01", "same"],
                &["", "2024-02-01", "no-end"],
                &["2024-01-01", "", "no-start"],
                &["someday", "2024-02-01", "unparsed"],
            ],
        );

        let out = RelationshipValidator::from_config(&CleaningConfig::default()).apply(data)?;

        assert_eq!(
            column(&out.dataset, "Id"),
            vec!["ok", "same", "no-end", "no-start", "unparsed"]
        );
        assert_eq!(out.affected(), 1);
        assert_eq!(
            out.actions.first().map(|a| a.description.as_str()),
            Some(
                "Removed 1 rows where 'Opportunity End Date' was earlier than 'Opportunity Start Date'"
            )
        );
        Ok(())
    }

    #[test]
    fn test_unparsed_columns_pass() -> Result<()> {
        let data = dataset(&headers(), &[&["2024-01-01", "2024-02-01", "raw"]]);
        let out = RelationshipValidator::from_config(&CleaningConfig::default()).apply(data)?;
        assert_eq!(out.dataset.len(), 1);
        assert_eq!(out.affected(), 0);
        Ok(())
    }

    #[test]
    fn test_missing_columns_skip_the_check() -> Result<()> {
        let data = dataset(&[("Id", ColumnKind::Categorical)], &[&["x"]]);
        let out = RelationshipValidator::from_config(&CleaningConfig::default()).apply(data)?;
        assert_eq!(out.dataset.len(), 1);
        assert!(out.actions.is_empty());
        Ok(())
    }
}
