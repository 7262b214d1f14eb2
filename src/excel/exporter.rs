//! Output writer - OutputTable → .xlsx

use crate::error::{ExpandError, ExpandResult};
use crate::types::{CellValue, OutputTable, OUTPUT_HEADERS, OUTPUT_SHEET_NAME};
use chrono::{Datelike, NaiveDateTime, Timelike};
use rust_xlsxwriter::{ExcelDateTime, Format, Formula, Workbook, Worksheet};
use std::path::Path;

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

// Column positions in the output sheet
const COL_WEEK_NUMBER: u16 = 0;
const COL_YEAR: u16 = 1;
const COL_DATE: u16 = 2;
const COL_COUNTRY: u16 = 3;
const COL_STATES: u16 = 4;
const COL_VALUE: u16 = 5;
const COL_KIND: u16 = 6;
const COL_PERCENT: u16 = 7;

/// Writes an expanded table to a single `dados_expandido` worksheet
pub struct OutputWriter {
    datetime_format: Format,
}

impl Default for OutputWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputWriter {
    pub fn new() -> Self {
        Self {
            datetime_format: Format::new().set_num_format(DATETIME_FORMAT),
        }
    }

    /// Render the workbook into an in-memory .xlsx buffer
    pub fn to_buffer(&self, table: &OutputTable) -> ExpandResult<Vec<u8>> {
        let mut workbook = self.build(table)?;
        workbook
            .save_to_buffer()
            .map_err(|e| ExpandError::Export(format!("Failed to render workbook: {}", e)))
    }

    /// Save the workbook to `output_path`
    pub fn save(&self, table: &OutputTable, output_path: &Path) -> ExpandResult<()> {
        let mut workbook = self.build(table)?;
        workbook
            .save(output_path)
            .map_err(|e| ExpandError::Export(format!("Failed to save Excel file: {}", e)))
    }

    fn build(&self, table: &OutputTable) -> ExpandResult<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(OUTPUT_SHEET_NAME)
            .map_err(|e| ExpandError::Export(format!("Failed to set worksheet name: {}", e)))?;

        for (col_idx, header) in OUTPUT_HEADERS.iter().enumerate() {
            worksheet
                .write_string(0, col_idx as u16, *header)
                .map_err(|e| ExpandError::Export(format!("Failed to write header: {}", e)))?;
        }

        // Data starts on sheet row 2 (index 1)
        for (idx, row) in table.rows.iter().enumerate() {
            let excel_row = idx as u32 + 1;

            self.write_cell(worksheet, excel_row, COL_WEEK_NUMBER, &row.week_number)?;
            if let Some(year) = row.year {
                worksheet
                    .write_number(excel_row, COL_YEAR, year as f64)
                    .map_err(|e| ExpandError::Export(format!("Failed to write year: {}", e)))?;
            }
            self.write_cell(worksheet, excel_row, COL_DATE, &row.date)?;
            write_text(worksheet, excel_row, COL_COUNTRY, row.country)?;
            write_text(worksheet, excel_row, COL_STATES, &row.state)?;
            write_reference(worksheet, excel_row, COL_VALUE, &row.value_ref)?;
            write_text(worksheet, excel_row, COL_KIND, row.kind)?;
            write_reference(worksheet, excel_row, COL_PERCENT, &row.percent_ref)?;
        }

        Ok(workbook)
    }

    /// Write a copied source cell keeping its native type
    fn write_cell(
        &self,
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        value: &CellValue,
    ) -> ExpandResult<()> {
        let result = match value {
            CellValue::Empty => return Ok(()),
            CellValue::Int(i) => worksheet.write_number(row, col, *i as f64),
            CellValue::Float(f) => worksheet.write_number(row, col, *f),
            CellValue::Text(s) => worksheet.write_string(row, col, s),
            CellValue::Bool(b) => worksheet.write_boolean(row, col, *b),
            CellValue::DateTime(dt) => match to_excel_datetime(dt) {
                Some(excel_dt) => {
                    worksheet.write_datetime_with_format(row, col, &excel_dt, &self.datetime_format)
                }
                // Outside Excel's date range: keep the text form
                None => worksheet.write_string(row, col, value.to_string()),
            },
        };
        result
            .map(|_| ())
            .map_err(|e| ExpandError::Export(format!("Failed to write cell: {}", e)))
    }
}

fn write_text(worksheet: &mut Worksheet, row: u32, col: u16, text: &str) -> ExpandResult<()> {
    worksheet
        .write_string(row, col, text)
        .map(|_| ())
        .map_err(|e| ExpandError::Export(format!("Failed to write text: {}", e)))
}

fn write_reference(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    reference: &str,
) -> ExpandResult<()> {
    worksheet
        .write_formula(row, col, Formula::new(reference))
        .map(|_| ())
        .map_err(|e| ExpandError::Export(format!("Failed to write formula: {}", e)))
}

fn to_excel_datetime(dt: &NaiveDateTime) -> Option<ExcelDateTime> {
    let year = u16::try_from(dt.year()).ok()?;
    ExcelDateTime::from_ymd(year, dt.month() as u8, dt.day() as u8)
        .and_then(|d| d.and_hms(dt.hour() as u16, dt.minute() as u8, dt.second() as f64))
        .ok()
}
