//! Cleaning report: the ordered log of corrective actions for one pipeline run.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Impute,
    Deduplicate,
    Standardize,
    ValidateNumeric,
    ValidateCategorical,
    ValidateRelationships,
}

impl StageKind {
    pub const ORDER: [Self; 6] = [
        Self::Impute,
        Self::Deduplicate,
        Self::Standardize,
        Self::ValidateNumeric,
        Self::ValidateCategorical,
        Self::ValidateRelationships,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Impute => "Impute",
            Self::Deduplicate => "Deduplicate",
            Self::Standardize => "Standardize",
            Self::ValidateNumeric => "ValidateNumeric",
            Self::ValidateCategorical => "ValidateCategorical",
            Self::ValidateRelationships => "ValidateRelationships",
        }
    }

    /// Whether this stage's `affected_count` counts removed records
    pub fn removes_rows(&self) -> bool {
        matches!(
            self,
            Self::Deduplicate
                | Self::ValidateNumeric
                | Self::ValidateCategorical
                | Self::ValidateRelationships
        )
    }
}

/// One corrective operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningAction {
    pub stage: StageKind,
    pub description: String,
    pub affected_count: usize,
}

impl CleaningAction {
    pub fn new(stage: StageKind, description: impl Into<String>, affected_count: usize) -> Self {
        Self {
            stage,
            description: description.into(),
            affected_count,
        }
    }
}

/// Complete record of one pipeline run.
///
/// Only the pipeline builds reports; once returned they are read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    initial_row_count: usize,
    final_row_count: usize,
    columns_processed: Vec<String>,
    actions: Vec<CleaningAction>,
}

impl CleaningReport {
    pub(crate) fn new(initial_row_count: usize, columns_processed: Vec<String>) -> Self {
        Self {
            initial_row_count,
            final_row_count: initial_row_count,
            columns_processed,
            actions: Vec::new(),
        }
    }

    pub(crate) fn extend(&mut self, actions: impl IntoIterator<Item = CleaningAction>) {
        self.actions.extend(actions);
    }

    pub(crate) fn finish(mut self, final_row_count: usize) -> Self {
        self.final_row_count = final_row_count;
        self
    }

    pub fn initial_row_count(&self) -> usize {
        self.initial_row_count
    }

    pub fn final_row_count(&self) -> usize {
        self.final_row_count
    }

    pub fn columns_processed(&self) -> &[String] {
        &self.columns_processed
    }

    pub fn actions(&self) -> &[CleaningAction] {
        &self.actions
    }

    pub fn actions_for(&self, stage: StageKind) -> impl Iterator<Item = &CleaningAction> + '_ {
        self.actions.iter().filter(move |a| a.stage == stage)
    }

    /// Sum of `affected_count` over one stage's actions
    pub fn affected_by(&self, stage: StageKind) -> usize {
        self.actions_for(stage).map(|a| a.affected_count).sum()
    }

    pub fn duplicates_removed(&self) -> usize {
        self.affected_by(StageKind::Deduplicate)
    }

    /// Records removed by every row-removing stage together
    pub fn rows_removed(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| a.stage.removes_rows())
            .map(|a| a.affected_count)
            .sum()
    }

    /// True when the run changed nothing: no fills, coercions or removals.
    pub fn is_clean(&self) -> bool {
        self.actions.iter().all(|a| a.affected_count == 0)
    }

    /// Render the plain-text cleaning log.
    pub fn render_log(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Data Cleaning Log:");
        let _ = writeln!(out, "1. Initial rows: {}", self.initial_row_count);
        let _ = writeln!(out, "2. Removed duplicates: {}", self.duplicates_removed());
        let _ = writeln!(out, "3. Final valid rows: {}", self.final_row_count);
        let _ = writeln!(out, "4. Columns cleaned: {}", self.columns_processed.join(", "));
        let _ = writeln!(out, "5. Actions Taken:");
        if self.actions.is_empty() {
            let _ = writeln!(out, "   - (none)");
        }
        for action in &self.actions {
            let _ = writeln!(
                out,
                "   - [{}] {} (affected: {})",
                action.stage.as_str(),
                action.description,
                action.affected_count
            );
        }
        out
    }

    /// A one-line summary for console output
    pub fn summary(&self) -> String {
        format!(
            "Cleaned {} → {} rows ({} duplicates, {} invalid removed), {} actions",
            self.initial_row_count,
            self.final_row_count,
            self.duplicates_removed(),
            self.rows_removed() - self.duplicates_removed(),
            self.actions.len()
        )
    }
}
