//! Format standardization for date and categorical text columns.
//!
//! Date columns are parsed into a Polars `Datetime` column; anything that does
//! not parse becomes missing rather than failing the run. Categorical cells
//! are trimmed and lower-cased.

use super::{CleaningStage, StageOutput, count_where, resolve_columns};
use crate::config::CleaningConfig;
use crate::dataset::{CANONICAL_DATE_FORMAT, DATE_TIME_UNIT, Dataset};
use crate::error::Result;
use crate::report::{CleaningAction, StageKind};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::*;

pub struct FormatStandardizer {
    date_columns: Vec<String>,
    normalize_columns: Vec<String>,
    date_formats: Vec<String>,
}

impl FormatStandardizer {
    pub fn new(
        date_columns: Vec<String>,
        normalize_columns: Vec<String>,
        date_formats: Vec<String>,
    ) -> Self {
        Self {
            date_columns,
            normalize_columns,
            date_formats,
        }
    }

    pub fn from_config(config: &CleaningConfig) -> Self {
        Self::new(
            config.date_columns.clone(),
            config.categorical_normalize_columns.clone(),
            config.date_formats.clone(),
        )
    }

    /// Parse one date cell. The canonical format is always tried first.
    pub fn parse_date(&self, raw: &str) -> Option<NaiveDateTime> {
        parse_date_with(raw, &self.date_formats)
    }

    fn parse_date_series(&self, series: &Series) -> Result<Series> {
        let text = series.cast(&DataType::String)?;
        let millis: Int64Chunked = text
            .str()?
            .into_iter()
            .map(|cell| {
                cell.and_then(|raw| {
                    let parsed = self.parse_date(raw);
                    if parsed.is_none() {
                        tracing::debug!("Unparseable date '{raw}' set to missing");
                    }
                    parsed.map(|date| date.and_utc().timestamp_millis())
                })
            })
            .collect();
        Ok(millis
            .into_datetime(DATE_TIME_UNIT, None)
            .into_series()
            .with_name(series.name().clone()))
    }

    /// Returns the number of cells coerced to missing.
    fn standardize_dates(&self, dataset: &mut Dataset, name: &str) -> Result<usize> {
        let series = dataset.frame().column(name)?.as_materialized_series().clone();
        if matches!(series.dtype(), DataType::Datetime(_, _)) {
            return Ok(0);
        }

        let present = series.len() - series.null_count();
        let parsed = self.parse_date_series(&series)?;
        let coerced = present - (parsed.len() - parsed.null_count());
        dataset.frame_mut().replace(name, parsed)?;
        Ok(coerced)
    }
}

/// Trim and lower-case a text column. Returns the number of cells that changed.
fn normalize_text(dataset: Dataset, name: &str) -> Result<(Dataset, usize)> {
    if dataset.frame().column(name)?.dtype() != &DataType::String {
        return Ok((dataset, 0));
    }

    let normalized = col(name).str().strip_chars(lit(NULL)).str().to_lowercase();
    let changed = count_where(dataset.frame(), col(name).neq(normalized.clone()))?;
    if changed == 0 {
        return Ok((dataset, 0));
    }
    let frame = dataset
        .frame()
        .clone()
        .lazy()
        .with_column(normalized.alias(name))
        .collect()?;
    Ok((dataset.with_frame(frame), changed))
}

impl CleaningStage for FormatStandardizer {
    fn stage(&self) -> StageKind {
        StageKind::Standardize
    }

    fn description(&self) -> String {
        format!(
            "Standardize {} date columns and {} categorical columns",
            self.date_columns.len(),
            self.normalize_columns.len()
        )
    }

    fn apply(&self, mut dataset: Dataset) -> Result<StageOutput> {
        let mut actions = Vec::new();

        for name in resolve_columns(&dataset, &self.date_columns) {
            let coerced = self.standardize_dates(&mut dataset, name)?;
            let mut description = format!("Standardized date format for '{name}'");
            if coerced > 0 {
                description.push_str(&format!(" ({coerced} unparseable values set to missing)"));
            }
            tracing::info!("{description}");
            actions.push(CleaningAction::new(StageKind::Standardize, description, coerced));
        }

        for name in resolve_columns(&dataset, &self.normalize_columns) {
            let (next, changed) = normalize_text(dataset, name)?;
            dataset = next;
            let description =
                format!("Standardized '{name}' column to lowercase and stripped whitespace");
            tracing::info!("{description} ({changed} values changed)");
            actions.push(CleaningAction::new(StageKind::Standardize, description, changed));
        }

        Ok(StageOutput::new(dataset, actions))
    }
}

/// Parse `raw` with the canonical format, then each of `formats` as a
/// date-time and as a plain date, then as RFC 3339.
///
/// RFC 3339 input keeps its wall-clock time; the offset is dropped.
pub fn parse_date_with(raw: &str, formats: &[String]) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, CANONICAL_DATE_FORMAT) {
        return Some(parsed);
    }
    for format in formats {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
        if let Ok(parsed) = NaiveDate::parse_from_str(raw, format) {
            return Some(parsed.and_time(NaiveTime::MIN));
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|parsed| parsed.naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ColumnKind;
    use crate::stages::test_support::{column, dataset, parsed};

    fn standardizer() -> FormatStandardizer {
        FormatStandardizer::from_config(&CleaningConfig::default())
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(y, m, d).and_then(|date| date.and_hms_opt(h, min, 0))
    }

    #[test]
    fn test_parse_date_formats() {
        let s = standardizer();
        let expected = at(2024, 3, 5, 0, 0);
        assert_eq!(s.parse_date("2024-03-05"), expected);
        assert_eq!(s.parse_date("03/05/2024"), expected);
        assert_eq!(s.parse_date(" 2024-03-05 00:00:00 "), expected);
        assert_eq!(s.parse_date("2024-03-05T00:00:00Z"), expected);
        assert_eq!(s.parse_date("03/05/2024 14:30"), at(2024, 3, 5, 14, 30));
        assert_eq!(s.parse_date("not a date"), None);
        assert_eq!(s.parse_date("2024-13-45"), None);
    }

    #[test]
    fn test_offset_timestamps_keep_wall_clock_time() {
        let s = standardizer();
        assert_eq!(s.parse_date("2024-03-05T10:00:00+02:00"), at(2024, 3, 5, 10, 0));
        assert_eq!(s.parse_date("2024-03-05T23:30:00-05:00"), at(2024, 3, 5, 23, 30));
    }

    #[test]
    fn test_dates_parse_or_become_missing() -> Result<()> {
        let data = dataset(
            &[("Apply Date", ColumnKind::Date)],
            &[&["2024-01-15"], &["garbage"], &[""], &["2023-12-31 08:00:00"]],
        );

        let out = standardizer().apply(data)?;

        assert!(matches!(
            out.dataset.frame().column("Apply Date")?.dtype(),
            DataType::Datetime(_, _)
        ));
        assert_eq!(
            column(&out.dataset, "Apply Date"),
            vec!["2024-01-15 00:00:00", "", "", "2023-12-31 08:00:00"]
        );
        let action = out.actions.first();
        assert_eq!(action.map(|a| a.affected_count), Some(1));
        assert_eq!(
            action.map(|a| a.description.as_str()),
            Some("Standardized date format for 'Apply Date' (1 unparseable values set to missing)")
        );
        Ok(())
    }

    #[test]
    fn test_parsed_dates_are_left_alone() -> Result<()> {
        let data = parsed(&[("Apply Date", ColumnKind::Date)], &[&["2024-01-15"], &["never"]]);
        let out = standardizer().apply(data.clone())?;
        assert_eq!(out.affected(), 0);
        assert_eq!(out.dataset, data);
        Ok(())
    }

    #[test]
    fn test_gender_lowercased_and_trimmed() -> Result<()> {
        let data = dataset(
            &[("Gender", ColumnKind::Categorical)],
            &[&["  Male "], &["female"], &["OTHER"], &[""]],
        );

        let out = standardizer().apply(data)?;

        assert_eq!(column(&out.dataset, "Gender"), vec!["male", "female", "other", ""]);
        assert_eq!(out.dataset.missing_count("Gender"), 1);
        assert_eq!(out.affected(), 2);
        Ok(())
    }

    #[test]
    fn test_whitespace_gender_becomes_empty_text() -> Result<()> {
        let data = dataset(&[("Gender", ColumnKind::Categorical)], &[&["   "]]);

        let out = standardizer().apply(data)?;

        assert_eq!(out.dataset.column_text("Gender")?, vec![Some(String::new())]);
        assert_eq!(out.dataset.missing_count("Gender"), 0);
        assert_eq!(out.affected(), 1);
        Ok(())
    }

    #[test]
    fn test_emits_one_action_per_present_column() -> Result<()> {
        let data = dataset(
            &[
                ("Opportunity End Date", ColumnKind::Date),
                ("Apply Date", ColumnKind::Date),
                ("Opportunity Start Date", ColumnKind::Date),
                ("Gender", ColumnKind::Categorical),
            ],
            &[],
        );
        let out = standardizer().apply(data)?;
        assert_eq!(out.actions.len(), 4);
        assert_eq!(out.affected(), 0);
        Ok(())
    }
}
