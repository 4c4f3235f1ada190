//! Exact-duplicate removal.

use super::{CleaningStage, StageOutput};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::report::{CleaningAction, StageKind};
use polars::prelude::{IntoLazy as _, UniqueKeepStrategy};

/// Drops every record equal to an earlier one, keeping first occurrences in order.
#[derive(Debug, Default)]
pub struct DuplicateEliminator;

impl CleaningStage for DuplicateEliminator {
    fn stage(&self) -> StageKind {
        StageKind::Deduplicate
    }

    fn description(&self) -> String {
        "Remove records identical to an earlier record across all columns".to_owned()
    }

    fn apply(&self, dataset: Dataset) -> Result<StageOutput> {
        let before = dataset.len();
        let frame = dataset
            .frame()
            .clone()
            .lazy()
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()?;
        let removed = before - frame.height();

        tracing::info!(
            "Removed {removed} duplicate rows, {} rows remain",
            frame.height()
        );
        let action = CleaningAction::new(
            StageKind::Deduplicate,
            format!("Removed {removed} duplicate rows"),
            removed,
        );
        Ok(StageOutput::new(dataset.with_frame(frame), vec![action]))
    }
}
