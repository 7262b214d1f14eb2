//! Source reader - workbook (.xlsx/.xls/.ods) → SourceTable

use crate::config::SourceSpec;
use crate::core::dates::parse_iso_datetime;
use crate::error::{ExpandError, ExpandResult};
use crate::types::{CellValue, SourceTable};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;

/// Reads the date and week-number columns described by a [`SourceSpec`]
pub struct SourceReader {
    spec: SourceSpec,
}

impl SourceReader {
    pub fn new(spec: SourceSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &SourceSpec {
        &self.spec
    }

    /// Read from a workbook on disk (format detected from the extension)
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> ExpandResult<SourceTable> {
        self.spec.validate()?;
        let mut workbook = open_workbook_auto(path.as_ref()).map_err(|e| {
            ExpandError::Workbook(format!(
                "Failed to open '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;
        self.read_workbook(&mut workbook)
    }

    /// Read from an uploaded workbook held in memory
    pub fn read_bytes(&self, bytes: Vec<u8>) -> ExpandResult<SourceTable> {
        self.spec.validate()?;
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| ExpandError::Workbook(format!("Failed to open upload: {}", e)))?;
        self.read_workbook(&mut workbook)
    }

    fn read_workbook<RS: Read + Seek>(&self, workbook: &mut Sheets<RS>) -> ExpandResult<SourceTable> {
        if !workbook.sheet_names().iter().any(|n| n == &self.spec.sheet) {
            return Err(ExpandError::SheetNotFound(self.spec.sheet.clone()));
        }

        let range = workbook
            .worksheet_range(&self.spec.sheet)
            .map_err(|e| ExpandError::Workbook(format!("Failed to read sheet: {}", e)))?;

        let dates = self.collect_column(&range, self.spec.date_column);
        let week_numbers = self.collect_column(&range, self.spec.week_column);

        debug!(
            sheet = %self.spec.sheet,
            dates = dates.len(),
            week_numbers = week_numbers.len(),
            "source columns read"
        );

        Ok(SourceTable::new(dates, week_numbers))
    }

    /// Non-empty cells of a 1-based column, top to bottom
    fn collect_column(&self, range: &Range<Data>, column: usize) -> Vec<CellValue> {
        let (Some(start), Some(end)) = (range.start(), range.end()) else {
            return Vec::new();
        };

        let (Ok(col), Ok(skip)) = (u32::try_from(column - 1), u32::try_from(self.spec.skip_rows))
        else {
            return Vec::new();
        };
        let first_row = start.0.max(skip);

        (first_row..=end.0)
            .filter_map(|row| range.get_value((row, col)))
            .map(convert_cell)
            .filter(|cell| !cell.is_empty())
            .collect()
    }
}

/// Map a calamine cell to a [`CellValue`]
pub fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        // as_datetime follows the workbook's 1900/1904 date system
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => CellValue::DateTime(value),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => match parse_iso_datetime(s) {
            Some(value) => CellValue::DateTime(value),
            None => CellValue::Text(s.clone()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
    }
}
