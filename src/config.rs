//! Cleaning configuration.
//!
//! Everything schema-specific lives here: which columns are dates, which are
//! validated against a categorical domain, which must be non-negative and
//! which date pairs must be ordered. Defaults describe the opportunity
//! dataset; a JSON file can override any field.

use crate::dataset::ColumnKind;
use crate::error::{CleanerError, Result, ResultExt as _};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Current configuration format version
pub const CONFIG_VERSION: &str = "0.1";

pub const DEFAULT_OUTPUT_FILE: &str = "cleaned_data.csv";
pub const DEFAULT_LOG_FILE: &str = "cleaning_log.txt";

/// A `(later, earlier)` date ordering constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipCheck {
    /// Column whose date must not precede `earlier`
    pub later: String,
    pub earlier: String,
}

impl RelationshipCheck {
    pub fn new(later: impl Into<String>, earlier: impl Into<String>) -> Self {
        Self {
            later: later.into(),
            earlier: earlier.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Format version for future migrations
    #[serde(default = "default_version")]
    pub version: String,

    /// Columns parsed as dates by the standardizer
    #[serde(default = "default_date_columns")]
    pub date_columns: Vec<String>,

    /// Columns lower-cased, trimmed and then checked against `valid_categorical_values`
    #[serde(default = "default_categorical_columns")]
    pub categorical_normalize_columns: Vec<String>,

    /// Numeric columns whose negative values invalidate a record
    #[serde(default = "default_non_negative_columns")]
    pub numeric_non_negative_columns: Vec<String>,

    /// Extra pass-through columns that are numeric (median-imputed, never validated).
    ///
    /// Empty by default: every column named here becomes required, and an
    /// unlisted pass-through column such as `Status Code` is treated as
    /// categorical and filled with its mode.
    #[serde(default)]
    pub numeric_columns: Vec<String>,

    #[serde(default = "default_valid_values")]
    pub valid_categorical_values: BTreeSet<String>,

    #[serde(default = "default_relationship_checks")]
    pub relationship_checks: Vec<RelationshipCheck>,

    /// chrono formats tried after the canonical format, date-times before dates
    #[serde(default = "default_date_formats")]
    pub date_formats: Vec<String>,

    /// Fill for a categorical column with no values at all
    #[serde(default = "default_unknown_fill")]
    pub unknown_fill: String,

    /// Fill for a numeric column with no values at all
    #[serde(default)]
    pub empty_numeric_fill: f64,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            date_columns: default_date_columns(),
            categorical_normalize_columns: default_categorical_columns(),
            numeric_non_negative_columns: default_non_negative_columns(),
            numeric_columns: Vec::new(),
            valid_categorical_values: default_valid_values(),
            relationship_checks: default_relationship_checks(),
            date_formats: default_date_formats(),
            unknown_fill: default_unknown_fill(),
            empty_numeric_fill: 0.0,
        }
    }
}

impl CleaningConfig {
    /// Load a configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&content)
    }

    /// Parse and validate a configuration from a JSON string
    ///
    /// # Errors
    ///
    /// Returns a configuration error for malformed JSON or invalid settings.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json).context("Failed to write config file")
    }

    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing every problem found.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.version != CONFIG_VERSION {
            problems.push(format!(
                "unsupported config version '{}', expected '{CONFIG_VERSION}'",
                self.version
            ));
        }

        if !self.categorical_normalize_columns.is_empty()
            && self.valid_categorical_values.is_empty()
        {
            problems.push("valid_categorical_values must not be empty".to_owned());
        }

        for check in &self.relationship_checks {
            for name in [&check.later, &check.earlier] {
                if !self.date_columns.contains(name) {
                    problems.push(format!(
                        "relationship check column '{name}' is not listed in date_columns"
                    ));
                }
            }
        }

        for name in self.numeric_non_negative_columns.iter().chain(&self.numeric_columns) {
            if self.date_columns.contains(name) || self.categorical_normalize_columns.contains(name)
            {
                problems.push(format!("column '{name}' is configured with conflicting kinds"));
            }
        }

        if !self.empty_numeric_fill.is_finite() {
            problems.push("empty_numeric_fill must be a finite number".to_owned());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(CleanerError::Config(problems.join("; ")))
        }
    }

    /// Kind a column takes in this configuration.
    ///
    /// Columns the configuration does not mention are categorical pass-through.
    pub fn column_kind(&self, name: &str) -> ColumnKind {
        let named = |list: &[String]| list.iter().any(|c| c == name);
        if named(&self.date_columns) {
            ColumnKind::Date
        } else if named(&self.numeric_non_negative_columns) || named(&self.numeric_columns) {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }

    /// Every column the pipeline expects in its input, in first-mention order.
    pub fn required_columns(&self) -> Vec<&str> {
        let mut required: Vec<&str> = Vec::new();
        let relationship_columns = self
            .relationship_checks
            .iter()
            .flat_map(|c| [&c.later, &c.earlier]);
        for name in self
            .date_columns
            .iter()
            .chain(&self.categorical_normalize_columns)
            .chain(&self.numeric_non_negative_columns)
            .chain(&self.numeric_columns)
            .chain(relationship_columns)
        {
            if !required.contains(&name.as_str()) {
                required.push(name);
            }
        }
        required
    }
}

fn default_version() -> String {
    CONFIG_VERSION.to_owned()
}

fn default_date_columns() -> Vec<String> {
    ["Opportunity End Date", "Apply Date", "Opportunity Start Date"]
        .map(str::to_owned)
        .to_vec()
}

fn default_categorical_columns() -> Vec<String> {
    vec!["Gender".to_owned()]
}

fn default_non_negative_columns() -> Vec<String> {
    vec!["Reward Amount".to_owned(), "Skill Points Earned".to_owned()]
}

fn default_valid_values() -> BTreeSet<String> {
    ["male", "female", "m", "f", "other"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

fn default_relationship_checks() -> Vec<RelationshipCheck> {
    vec![RelationshipCheck::new(
        "Opportunity End Date",
        "Opportunity Start Date",
    )]
}

fn default_date_formats() -> Vec<String> {
    [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d",
        "%m/%d/%Y",
        "%Y/%m/%d",
        "%d %B %Y",
        "%B %d, %Y",
    ]
    .map(str::to_owned)
    .to_vec()
}

fn default_unknown_fill() -> String {
    "Unknown".to_owned()
}
