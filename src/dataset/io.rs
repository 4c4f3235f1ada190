//! CSV loading and saving through Polars.
//!
//! Every input column is read as text; the configuration, not Polars type
//! inference, decides how each column is interpreted.

use super::{CANONICAL_DATE_FORMAT, Column as DatasetColumn, Dataset};
use crate::config::CleaningConfig;
use crate::error::{CleanerError, Result, ResultExt as _};
use polars::prelude::*;
use std::path::Path;

/// Load a CSV file into a [`Dataset`] typed by `config`.
///
/// # Errors
///
/// Returns an error if the file is missing, is not CSV, or cannot be parsed.
pub fn load_dataset(path: impl AsRef<Path>, config: &CleaningConfig) -> Result<Dataset> {
    let path = path.as_ref();
    check_csv_extension(path)?;
    if !path.exists() {
        return Err(CleanerError::InvalidPath(format!(
            "{} does not exist",
            path.display()
        )));
    }

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()
        .with_context(|| format!("Failed to read CSV {}", path.display()))?;

    let dataset = dataframe_to_dataset(df, config)?;
    tracing::info!(
        "Loaded {} rows and {} columns from {}",
        dataset.len(),
        dataset.columns().len(),
        path.display()
    );
    Ok(dataset)
}

/// Type an all-text frame by the configured column kinds.
///
/// # Errors
///
/// Returns an error if a numeric column was not read as text.
pub fn dataframe_to_dataset(df: DataFrame, config: &CleaningConfig) -> Result<Dataset> {
    let columns = df
        .get_column_names()
        .into_iter()
        .map(|name| DatasetColumn::new(name.as_str(), config.column_kind(name)))
        .collect();
    Dataset::from_text_frame(df, columns)
}

/// Write a dataset as CSV with a header row. Dates use the canonical format
/// and missing values are written as empty fields.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_dataset(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut df = dataset.frame().clone();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let file = std::fs::File::create(path).context("Failed to create CSV file")?;
    CsvWriter::new(file)
        .include_header(true)
        .with_datetime_format(Some(CANONICAL_DATE_FORMAT.to_owned()))
        .finish(&mut df)
        .context("Failed to write CSV file")?;

    tracing::info!("Saved {} rows to {}", dataset.len(), path.display());
    Ok(())
}

fn check_csv_extension(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();
    if ext == "csv" {
        Ok(())
    } else {
        Err(CleanerError::InvalidPath(format!(
            "Unsupported file extension '{ext}' for {}",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ColumnKind;
    use crate::stages::{CleaningStage as _, FormatStandardizer};

    const CSV: &str = "\
Opportunity End Date,Apply Date,Opportunity Start Date,Gender,Reward Amount,Skill Points Earned,Country
2024-06-30,2024-01-10,2024-01-01,Male,100,10,India
2024-07-31,,2024-02-01,female,abc,,\"Lagos, Nigeria\"
";

    #[test]
    fn test_load_types_columns_from_config() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("raw.csv");
        std::fs::write(&path, CSV)?;

        let dataset = load_dataset(&path, &CleaningConfig::default())?;

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.column("Apply Date").map(|c| c.kind), Some(ColumnKind::Date));
        assert_eq!(dataset.column("Country").map(|c| c.kind), Some(ColumnKind::Categorical));
        assert_eq!(
            dataset.column_text("Reward Amount")?,
            vec![Some("100".to_owned()), None]
        );
        assert_eq!(dataset.missing_count("Apply Date"), 1);
        assert_eq!(dataset.missing_count("Skill Points Earned"), 1);
        assert_eq!(
            dataset.column_text("Country")?,
            vec![Some("India".to_owned()), Some("Lagos, Nigeria".to_owned())]
        );
        Ok(())
    }

    #[test]
    fn test_save_then_load_preserves_values() -> Result<()> {
        let config = CleaningConfig::default();
        let dataset = Dataset::from_raw_rows(
            vec![
                DatasetColumn::new("Gender", ColumnKind::Categorical),
                DatasetColumn::new("Reward Amount", ColumnKind::Numeric),
            ],
            &[vec![Some("male"), Some("12.5")], vec![Some("f"), None]],
        )?;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("out.csv");
        save_dataset(&dataset, &path)?;
        let reloaded = load_dataset(&path, &config)?;

        assert_eq!(reloaded, dataset);
        Ok(())
    }

    #[test]
    fn test_parsed_dates_are_written_canonically() -> Result<()> {
        let config = CleaningConfig::default();
        let raw = Dataset::from_raw_rows(
            vec![
                DatasetColumn::new("Apply Date", ColumnKind::Date),
                DatasetColumn::new("Id", ColumnKind::Categorical),
            ],
            &[vec![Some("03/05/2024"), Some("a")], vec![Some("later"), Some("b")]],
        )?;
        let parsed = FormatStandardizer::from_config(&config).apply(raw)?.dataset;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("dates.csv");
        save_dataset(&parsed, &path)?;

        let written = std::fs::read_to_string(&path)?;
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines, vec!["Apply Date,Id", "2024-03-05 00:00:00,a", ",b"]);
        Ok(())
    }

    #[test]
    fn test_rejects_bad_paths() {
        let config = CleaningConfig::default();
        assert!(matches!(
            load_dataset("data.parquet", &config),
            Err(CleanerError::InvalidPath(_))
        ));
        assert!(matches!(
            load_dataset("definitely/not/here.csv", &config),
            Err(CleanerError::InvalidPath(_))
        ));
    }
}
