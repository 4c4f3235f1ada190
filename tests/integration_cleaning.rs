//! Integration tests for the full cleaning run
//!
//! These tests clean fixture files end to end and check the written CSV
//! and cleaning log.

use opportunity_cleaner::config::CleaningConfig;
use opportunity_cleaner::dataset::Dataset;
use opportunity_cleaner::dataset::io::load_dataset;
use opportunity_cleaner::error::{CleanerError, Result};
use opportunity_cleaner::pipeline::run_files;
use opportunity_cleaner::report::StageKind;
use std::path::PathBuf;

fn column(dataset: &Dataset, name: &str) -> Vec<String> {
    dataset
        .column_text(name)
        .unwrap_or_else(|e| panic!("no column {name}: {e}"))
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect()
}

#[test]
fn test_clean_opportunities_csv() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("cleaned_data.csv");
    let log = dir.path().join("cleaning_log.txt");
    let config = CleaningConfig::default();

    let run = run_files(&config, "testdata/opportunities.csv", &output, &log)?;

    let report = &run.report;
    assert_eq!(report.initial_row_count(), 10);
    assert_eq!(report.final_row_count(), 6);
    assert_eq!(report.duplicates_removed(), 1);
    assert_eq!(report.affected_by(StageKind::Impute), 5);
    assert_eq!(report.affected_by(StageKind::ValidateNumeric), 1);
    assert_eq!(report.affected_by(StageKind::ValidateCategorical), 1);
    assert_eq!(report.affected_by(StageKind::ValidateRelationships), 1);
    assert_eq!(report.columns_processed().len(), 8);

    let cleaned = load_dataset(&output, &config)?;
    assert_eq!(cleaned.len(), 6);
    assert_eq!(
        column(&cleaned, "Opportunity Name"),
        vec!["Data Camp", "Web Sprint", "Design", "Security", "Finance", "Marketing"]
    );
    assert_eq!(
        column(&cleaned, "Gender"),
        vec!["male", "female", "m", "male", "f", "male"]
    );
    assert_eq!(column(&cleaned, "Reward Amount"), vec!["100", "50", "50", "40", "60", "70"]);
    assert_eq!(column(&cleaned, "Skill Points Earned"), vec!["10", "5", "6", "6", "8", "7"]);
    assert_eq!(
        column(&cleaned, "Country"),
        vec!["India", "Nigeria", "Chile", "Brazil", "India", "India"]
    );
    assert_eq!(
        column(&cleaned, "Opportunity End Date"),
        vec![
            "2024-06-30 00:00:00",
            "2024-07-31 00:00:00",
            "2024-10-31 00:00:00",
            "2024-11-30 00:00:00",
            "",
            "2024-12-31 00:00:00",
        ]
    );
    assert_eq!(
        column(&cleaned, "Apply Date"),
        vec![
            "2024-01-10 00:00:00",
            "2024-02-10 09:30:00",
            "2024-01-10 00:00:00",
            "2024-11-05 00:00:00",
            "2024-12-10 00:00:00",
            "2024-12-15 00:00:00",
        ]
    );

    let text = std::fs::read_to_string(&log)?;
    assert!(text.starts_with("Data Cleaning Log:\n1. Initial rows: 10\n2. Removed duplicates: 1\n3. Final valid rows: 6\n"));
    assert!(text.contains("Filled missing values in 'Reward Amount' with median value '50'"));
    assert!(text.contains("Standardized date format for 'Opportunity End Date' (1 unparseable values set to missing)"));
    assert!(text.contains("Removed 1 rows with invalid 'Gender' values"));
    Ok(())
}

#[test]
fn test_rerun_only_reimputes_coerced_dates() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = CleaningConfig::default();
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");

    run_files(&config, "testdata/opportunities.csv", &first, dir.path().join("first.txt"))?;
    let rerun = run_files(&config, &first, &second, dir.path().join("second.txt"))?;

    assert_eq!(rerun.report.duplicates_removed(), 0);
    assert_eq!(rerun.report.affected_by(StageKind::Standardize), 0);
    assert_eq!(rerun.report.affected_by(StageKind::ValidateNumeric), 0);
    assert_eq!(rerun.report.affected_by(StageKind::ValidateCategorical), 0);

    // The end date coerced to missing on the first run is imputed with the
    // mode (2024-06-30), which now precedes that record's start date.
    assert_eq!(rerun.report.affected_by(StageKind::Impute), 1);
    assert_eq!(rerun.report.affected_by(StageKind::ValidateRelationships), 1);
    assert_eq!(rerun.report.final_row_count(), 5);
    Ok(())
}

#[test]
fn test_missing_column_fails_without_output() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let output = dir.path().join("cleaned_data.csv");
    let log = dir.path().join("cleaning_log.txt");

    let result = run_files(
        &CleaningConfig::default(),
        PathBuf::from("testdata/missing_gender.csv"),
        &output,
        &log,
    );

    match result {
        Err(CleanerError::Schema(message)) => assert!(message.contains("'Gender'")),
        other => panic!("expected schema error, got {other:?}"),
    }
    assert!(!output.exists());
    assert!(!log.exists());
}
