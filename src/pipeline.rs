//! The cleaning pipeline.
//!
//! [`CleaningPipeline`] runs six stages in a fixed order over one in-memory
//! [`Dataset`]:
//!
//! 1. **Impute** missing values (median / mode)
//! 2. **Deduplicate** exact duplicate records
//! 3. **Standardize** date and categorical formats
//! 4. **Validate numeric** columns are non-negative
//! 5. **Validate categorical** values against the allowed domain
//! 6. **Validate relationships** between date columns
//!
//! Duplicates are detected on imputed data, and validation runs on
//! standardized data. The pipeline holds nothing but its configuration, so
//! independent runs can share one instance.
//!
//! ```no_run
//! use opportunity_cleaner::config::CleaningConfig;
//! use opportunity_cleaner::dataset::io::load_dataset;
//! use opportunity_cleaner::pipeline::CleaningPipeline;
//!
//! let config = CleaningConfig::default();
//! let raw = load_dataset("Opportunity Wise Data.csv", &config)?;
//! let (cleaned, report) = CleaningPipeline::new(config)?.run(raw)?;
//! println!("{} rows kept\n{}", cleaned.len(), report.render_log());
//! # Ok::<(), opportunity_cleaner::error::CleanerError>(())
//! ```

pub mod executor;
pub mod validation;

pub use executor::{RunSummary, run_files};
pub use validation::{ValidationError, validate_schema};

use crate::config::CleaningConfig;
use crate::dataset::Dataset;
use crate::error::{CleanerError, Result};
use crate::report::CleaningReport;
use crate::stages::{
    CategoricalValidator, CleaningStage, DuplicateEliminator, FormatStandardizer,
    MissingValueImputer, NumericValidator, RelationshipValidator, StageOutput,
};

#[derive(Debug, Clone, Default)]
pub struct CleaningPipeline {
    config: CleaningConfig,
}

impl CleaningPipeline {
    /// # Errors
    ///
    /// Returns a configuration error if `config` is inconsistent.
    pub fn new(config: CleaningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// The stages in execution order.
    pub fn stages(&self) -> Vec<Box<dyn CleaningStage>> {
        vec![
            Box::new(MissingValueImputer::from_config(&self.config)),
            Box::new(DuplicateEliminator),
            Box::new(FormatStandardizer::from_config(&self.config)),
            Box::new(NumericValidator::from_config(&self.config)),
            Box::new(CategoricalValidator::from_config(&self.config)),
            Box::new(RelationshipValidator::from_config(&self.config)),
        ]
    }

    /// Clean `raw`, returning the cleaned dataset and the report of the run.
    ///
    /// # Errors
    ///
    /// Returns a schema error, before any stage runs, if `raw` lacks a
    /// configured column or holds one with the wrong kind.
    pub fn run(&self, raw: Dataset) -> Result<(Dataset, CleaningReport)> {
        let errors = validate_schema(&self.config, &raw);
        if !errors.is_empty() {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            tracing::error!("Schema validation failed: {}", messages.join("; "));
            return Err(CleanerError::Schema(messages.join("; ")));
        }

        let columns = raw.columns().iter().map(|c| c.name.clone()).collect();
        let mut report = CleaningReport::new(raw.len(), columns);
        tracing::info!("Starting cleaning run on {} rows", raw.len());

        let mut dataset = raw;
        for stage in self.stages() {
            tracing::debug!("Running stage {}: {}", stage.stage().as_str(), stage.description());
            let StageOutput {
                dataset: next,
                actions,
            } = stage.apply(dataset)?;
            report.extend(actions);
            dataset = next;
        }

        let report = report.finish(dataset.len());
        tracing::info!("{}", report.summary());
        Ok((dataset, report))
    }
}
