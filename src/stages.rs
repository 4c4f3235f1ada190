//! Cleaning stages.
//!
//! Each stage takes ownership of a [`Dataset`], returns its successor and the
//! actions it performed. Stages never see each other; the pipeline threads
//! the dataset through them in [`StageKind::ORDER`]. The work itself is done
//! with Polars expressions over the dataset's frame.

pub mod categorical;
pub mod dedup;
pub mod impute;
pub mod numeric;
pub mod relationship;
pub mod standardize;

pub use categorical::CategoricalValidator;
pub use dedup::DuplicateEliminator;
pub use impute::MissingValueImputer;
pub use numeric::NumericValidator;
pub use relationship::RelationshipValidator;
pub use standardize::FormatStandardizer;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::report::{CleaningAction, StageKind};
use polars::prelude::{DataFrame, DataType, Expr, IntoLazy as _};

/// What a stage hands to the next one.
#[derive(Debug)]
pub struct StageOutput {
    pub dataset: Dataset,
    pub actions: Vec<CleaningAction>,
}

impl StageOutput {
    pub fn new(dataset: Dataset, actions: Vec<CleaningAction>) -> Self {
        Self { dataset, actions }
    }

    /// Total `affected_count` across the actions of this output
    pub fn affected(&self) -> usize {
        self.actions.iter().map(|a| a.affected_count).sum()
    }
}

/// A single step of the cleaning pipeline.
pub trait CleaningStage {
    /// Which pipeline slot this stage fills
    fn stage(&self) -> StageKind;

    /// Short human-readable description of what the stage does
    fn description(&self) -> String;

    /// Transform `dataset` into its successor.
    ///
    /// # Errors
    ///
    /// Returns an error if Polars fails to evaluate the stage's expressions.
    fn apply(&self, dataset: Dataset) -> Result<StageOutput>;
}

/// The configured column names present in `dataset`, skipping absent ones.
///
/// The pipeline validates the schema up front, so a miss only happens when a
/// stage runs standalone on a narrower dataset.
pub(crate) fn resolve_columns<'a>(dataset: &Dataset, names: &'a [String]) -> Vec<&'a str> {
    names
        .iter()
        .filter(|name| {
            let present = dataset.column(name).is_some();
            if !present {
                tracing::warn!("Column '{name}' not present in dataset, skipping");
            }
            present
        })
        .map(String::as_str)
        .collect()
}

/// Keep the rows where `keep` is true, in order. Returns the number removed.
pub(crate) fn filter_rows(dataset: Dataset, keep: Expr) -> Result<(Dataset, usize)> {
    let before = dataset.len();
    let frame = dataset.frame().clone().lazy().filter(keep).collect()?;
    let removed = before - frame.height();
    Ok((dataset.with_frame(frame), removed))
}

/// Number of rows of `frame` where `predicate` is true. Nulls count as false.
pub(crate) fn count_where(frame: &DataFrame, predicate: Expr) -> Result<usize> {
    let counted = frame
        .clone()
        .lazy()
        .select([predicate.sum().cast(DataType::UInt64).alias("count")])
        .collect()?;
    let count = counted
        .column("count")?
        .as_materialized_series()
        .u64()?
        .get(0)
        .unwrap_or(0);
    Ok(usize::try_from(count).unwrap_or(usize::MAX))
}
