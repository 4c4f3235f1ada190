//! Schema validation.
//!
//! Checks a dataset against the configuration before any stage runs, so a
//! run either fails up front with every problem listed or cleans the whole
//! dataset. Column names are unique by construction: the frame under a
//! [`Dataset`] rejects duplicates.

use crate::config::CleaningConfig;
use crate::dataset::Dataset;

/// Validation error with the offending column, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub column: Option<String>,
    pub message: String,
}

impl ValidationError {
    fn column(column: &str, message: impl Into<String>) -> Self {
        Self {
            column: Some(column.to_owned()),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.column {
            Some(column) => write!(f, "Column '{column}': {}", self.message),
            None => write!(f, "Schema: {}", self.message),
        }
    }
}

/// Validate a dataset's columns against the configuration
pub fn validate_schema(config: &CleaningConfig, dataset: &Dataset) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for required in config.required_columns() {
        match dataset.column(required) {
            None => errors.push(ValidationError::column(
                required,
                "required column not found in input",
            )),
            Some(column) => {
                let expected = config.column_kind(required);
                if column.kind != expected {
                    errors.push(ValidationError::column(
                        required,
                        format!(
                            "expected {} column, found {}",
                            expected.as_str(),
                            column.kind.as_str()
                        ),
                    ));
                }
            }
        }
    }

    errors
}
