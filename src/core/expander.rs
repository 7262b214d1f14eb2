//! Row expansion engine
//!
//! Repeats each source date `repetitions` times, assigns cyclic state labels
//! and builds the VALOR/PERCENT external references for every output row.

use crate::core::columns::ColumnRange;
use crate::core::dates::{extract_year, OnParseError};
use crate::error::{ExpandError, ExpandResult};
use crate::labels;
use crate::types::{OutputRow, OutputTable, SourceTable, COUNTRY, KIND, MAX_OUTPUT_ROWS};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Workbook name used in generated references unless configured otherwise
pub const DEFAULT_EXTERNAL_WORKBOOK: &str = "SBS_Regional_Farmer_Selling_Estimates.xlsx";

/// Parameters of a single expansion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionParams {
    /// Consecutive output rows generated per source date
    pub repetitions: usize,
    /// Cyclic STATES labels
    pub labels: Vec<String>,
    pub value_range: ColumnRange,
    pub percent_range: ColumnRange,
    pub value_base_row: u32,
    pub percent_base_row: u32,
    /// Explicit output row count; defaults to `dates * repetitions`
    pub total_rows: Option<usize>,
    /// Sheet of the external workbook the references point into
    pub target_sheet_name: String,
    pub external_workbook: String,
    pub on_parse_error: OnParseError,
}

impl Default for ExpansionParams {
    fn default() -> Self {
        Self {
            repetitions: 17,
            labels: labels::default_labels(),
            value_range: ColumnRange::new("C", "S"),
            percent_range: ColumnRange::new("W", "AM"),
            value_base_row: 4,
            percent_base_row: 4,
            total_rows: None,
            target_sheet_name: "sbs_nc_21".to_string(),
            external_workbook: DEFAULT_EXTERNAL_WORKBOOK.to_string(),
            on_parse_error: OnParseError::Blank,
        }
    }
}

/// Builds `=[workbook]sheet!$COL$ROW` references that walk a column range
/// left to right, moving one row down after each full pass.
#[derive(Debug, Clone)]
pub struct ReferenceBuilder {
    prefix: String,
    columns: Vec<String>,
    base_row: u32,
}

impl ReferenceBuilder {
    pub fn new(
        workbook: &str,
        sheet: &str,
        range: &ColumnRange,
        base_row: u32,
    ) -> ExpandResult<Self> {
        if base_row == 0 {
            return Err(ExpandError::InvalidParameter(format!(
                "base row for range {} must be at least 1",
                range
            )));
        }

        Ok(Self {
            prefix: format!("=[{}]{}!", workbook, sheet),
            columns: range.columns()?,
            base_row,
        })
    }

    /// Reference for output row `index`
    pub fn reference(&self, index: usize) -> String {
        let width = self.columns.len();
        let row = self.base_row as usize + index / width;
        let column = &self.columns[index % width];
        format!("{}${}${}", self.prefix, column, row)
    }
}

/// Expand `source` into the output table.
///
/// Returns the table together with the number of rows produced.
pub fn expand(
    source: &SourceTable,
    params: &ExpansionParams,
) -> ExpandResult<(OutputTable, usize)> {
    if source.dates.is_empty() {
        return Err(ExpandError::EmptySource {
            column: "date".to_string(),
        });
    }
    if source.week_numbers.is_empty() {
        return Err(ExpandError::EmptySource {
            column: "week number".to_string(),
        });
    }
    if params.labels.is_empty() {
        return Err(ExpandError::EmptyLabels);
    }
    if params.repetitions == 0 {
        return Err(ExpandError::InvalidParameter(
            "repetitions must be at least 1".to_string(),
        ));
    }

    let value_refs = ReferenceBuilder::new(
        &params.external_workbook,
        &params.target_sheet_name,
        &params.value_range,
        params.value_base_row,
    )?;
    let percent_refs = ReferenceBuilder::new(
        &params.external_workbook,
        &params.target_sheet_name,
        &params.percent_range,
        params.percent_base_row,
    )?;

    let total_rows = match params.total_rows {
        Some(n) => n,
        None => source
            .dates
            .len()
            .checked_mul(params.repetitions)
            .unwrap_or(usize::MAX),
    };
    if total_rows > MAX_OUTPUT_ROWS {
        return Err(ExpandError::InvalidParameter(format!(
            "{} output rows requested, a sheet holds at most {}",
            total_rows, MAX_OUTPUT_ROWS
        )));
    }

    debug!(
        dates = source.dates.len(),
        week_numbers = source.week_numbers.len(),
        repetitions = params.repetitions,
        total_rows,
        "expanding source table"
    );

    let mut rows = Vec::with_capacity(total_rows);
    for i in 0..total_rows {
        let source_index = i / params.repetitions;

        let date = &source.dates[source_index % source.dates.len()];

        let week_number = if source_index < source.week_numbers.len() {
            &source.week_numbers[source_index]
        } else {
            &source.week_numbers[source_index % source.week_numbers.len()]
        };

        let year = match extract_year(date) {
            Some(year) => Some(year),
            None => match params.on_parse_error {
                OnParseError::Blank => None,
                OnParseError::Fail => {
                    return Err(ExpandError::DateParse {
                        index: i,
                        value: date.to_string(),
                    })
                }
            },
        };

        rows.push(OutputRow {
            week_number: week_number.clone(),
            year,
            date: date.clone(),
            country: COUNTRY,
            state: params.labels[i % params.labels.len()].clone(),
            value_ref: value_refs.reference(i),
            kind: KIND,
            percent_ref: percent_refs.reference(i),
        });
    }

    Ok((OutputTable { rows }, total_rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn params() -> ExpansionParams {
        ExpansionParams {
            repetitions: 3,
            labels: vec!["A".to_string(), "B".to_string()],
            value_range: ColumnRange::new("C", "R"),
            percent_range: ColumnRange::new("U", "AJ"),
            value_base_row: 6,
            percent_base_row: 6,
            total_rows: None,
            target_sheet_name: "sbs_nc_21".to_string(),
            external_workbook: DEFAULT_EXTERNAL_WORKBOOK.to_string(),
            on_parse_error: OnParseError::Blank,
        }
    }

    fn source() -> SourceTable {
        SourceTable::new(
            vec![
                CellValue::from("2023-07-01 00:00:00"),
                CellValue::from("2023-07-08 00:00:00"),
            ],
            vec![CellValue::Int(26), CellValue::Int(27)],
        )
    }

    #[test]
    fn test_row_count_defaults_to_dates_times_repetitions() {
        let (table, total) = expand(&source(), &params()).unwrap();
        assert_eq!(total, 6);
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn test_consecutive_repetitions() {
        let (table, _) = expand(&source(), &params()).unwrap();
        let weeks: Vec<String> = table
            .rows
            .iter()
            .map(|r| r.week_number.to_string())
            .collect();
        assert_eq!(weeks, vec!["26", "26", "26", "27", "27", "27"]);
        assert!(table.rows[..3]
            .iter()
            .all(|r| r.date == CellValue::from("2023-07-01 00:00:00")));
    }

    #[test]
    fn test_states_cycle() {
        let (table, _) = expand(&source(), &params()).unwrap();
        let states: Vec<&str> = table.rows.iter().map(|r| r.state.as_str()).collect();
        assert_eq!(states, vec!["A", "B", "A", "B", "A", "B"]);
    }

    #[test]
    fn test_value_reference_blocks() {
        let mut p = params();
        p.total_rows = Some(20);
        let (table, _) = expand(&source(), &p).unwrap();

        assert_eq!(
            table.rows[0].value_ref,
            "=[SBS_Regional_Farmer_Selling_Estimates.xlsx]sbs_nc_21!$C$6"
        );
        assert_eq!(
            table.rows[15].value_ref,
            "=[SBS_Regional_Farmer_Selling_Estimates.xlsx]sbs_nc_21!$R$6"
        );
        // C..R is 16 columns wide: row 16 starts the next block
        assert_eq!(
            table.rows[16].value_ref,
            "=[SBS_Regional_Farmer_Selling_Estimates.xlsx]sbs_nc_21!$C$7"
        );
        assert_eq!(
            table.rows[16].percent_ref,
            "=[SBS_Regional_Farmer_Selling_Estimates.xlsx]sbs_nc_21!$U$7"
        );
    }

    #[test]
    fn test_custom_external_workbook() {
        let mut p = params();
        p.external_workbook = "regional.xlsx".to_string();
        let (table, _) = expand(&source(), &p).unwrap();
        assert_eq!(table.rows[1].percent_ref, "=[regional.xlsx]sbs_nc_21!$V$6");
    }

    #[test]
    fn test_total_rows_override_wraps() {
        let mut p = params();
        p.total_rows = Some(9);
        let (table, total) = expand(&source(), &p).unwrap();
        assert_eq!(total, 9);
        // source_index 2 wraps back to the first date and week number
        assert_eq!(table.rows[8].week_number, CellValue::Int(26));
        assert_eq!(table.rows[8].date, CellValue::from("2023-07-01 00:00:00"));
    }

    #[test]
    fn test_uneven_source_columns_wrap_independently() {
        let source = SourceTable::new(
            vec![
                CellValue::from("a"),
                CellValue::from("b"),
                CellValue::from("c"),
            ],
            vec![CellValue::Int(1), CellValue::Int(2)],
        );
        let mut p = params();
        p.repetitions = 1;
        let (table, _) = expand(&source, &p).unwrap();
        let weeks: Vec<CellValue> = table.rows.iter().map(|r| r.week_number.clone()).collect();
        assert_eq!(
            weeks,
            vec![CellValue::Int(1), CellValue::Int(2), CellValue::Int(1)]
        );
    }

    #[test]
    fn test_zero_rows_is_header_only() {
        let mut p = params();
        p.total_rows = Some(0);
        let (table, total) = expand(&source(), &p).unwrap();
        assert_eq!(total, 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_year_extraction() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let source = SourceTable::new(
            vec![
                CellValue::DateTime(dt),
                CellValue::from("2023-07-01 00:00:00"),
                CellValue::from("not-a-date"),
            ],
            vec![CellValue::Int(1)],
        );
        let mut p = params();
        p.repetitions = 1;
        let (table, _) = expand(&source, &p).unwrap();
        let years: Vec<Option<i32>> = table.rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![Some(2024), Some(2023), None]);
    }

    #[test]
    fn test_fail_policy_rejects_unreadable_dates() {
        let source = SourceTable::new(vec![CellValue::from("DATA")], vec![CellValue::Int(1)]);
        let mut p = params();
        p.on_parse_error = OnParseError::Fail;
        match expand(&source, &p) {
            Err(ExpandError::DateParse { index, value }) => {
                assert_eq!(index, 0);
                assert_eq!(value, "DATA");
            }
            other => panic!("Expected DateParse, got {:?}", other),
        }
    }

    #[test]
    fn test_errors() {
        let p = params();
        let empty_dates = SourceTable::new(vec![], vec![CellValue::Int(1)]);
        assert!(matches!(
            expand(&empty_dates, &p),
            Err(ExpandError::EmptySource { .. })
        ));

        let empty_weeks = SourceTable::new(vec![CellValue::from("x")], vec![]);
        assert!(matches!(
            expand(&empty_weeks, &p),
            Err(ExpandError::EmptySource { .. })
        ));

        let mut no_labels = params();
        no_labels.labels.clear();
        assert!(matches!(
            expand(&source(), &no_labels),
            Err(ExpandError::EmptyLabels)
        ));

        let mut reversed = params();
        reversed.percent_range = ColumnRange::new("AJ", "U");
        assert!(matches!(
            expand(&source(), &reversed),
            Err(ExpandError::InvalidRange { .. })
        ));

        let mut zero_reps = params();
        zero_reps.repetitions = 0;
        assert!(matches!(
            expand(&source(), &zero_reps),
            Err(ExpandError::InvalidParameter(_))
        ));

        let mut zero_base = params();
        zero_base.value_base_row = 0;
        assert!(matches!(
            expand(&source(), &zero_base),
            Err(ExpandError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_total_rows_above_sheet_limit_rejected() {
        for total in [MAX_OUTPUT_ROWS + 1, usize::MAX] {
            let result = expand(
                &source(),
                &ExpansionParams {
                    total_rows: Some(total),
                    ..params()
                },
            );
            assert!(matches!(result, Err(ExpandError::InvalidParameter(_))));
        }

        let huge_repetitions = ExpansionParams {
            repetitions: usize::MAX / 2 + 1,
            ..params()
        };
        assert!(matches!(
            expand(&source(), &huge_repetitions),
            Err(ExpandError::InvalidParameter(_))
        ));

        let (table, total) = expand(
            &source(),
            &ExpansionParams {
                total_rows: Some(20),
                ..params()
            },
        )
        .unwrap();
        assert_eq!((table.len(), total), (20, 20));
    }

    #[test]
    fn test_deterministic() {
        let first = expand(&source(), &params()).unwrap();
        let second = expand(&source(), &params()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_source_row() {
        let source = SourceTable::new(vec![CellValue::from("x")], vec![CellValue::Int(5)]);
        let mut p = params();
        p.repetitions = 1;
        p.total_rows = Some(4);
        let (table, _) = expand(&source, &p).unwrap();
        assert!(table.rows.iter().all(|r| r.week_number == CellValue::Int(5)));
        let states: Vec<&str> = table.rows.iter().map(|r| r.state.as_str()).collect();
        assert_eq!(states, vec!["A", "B", "A", "B"]);
    }
}
