//! Year extraction from date cells

use crate::types::CellValue;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Text format accepted for dates stored as strings
pub const DATE_TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What to do when a date cell has no readable year
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnParseError {
    /// Leave the YEAR cell blank
    #[default]
    Blank,
    /// Abort the expansion
    Fail,
}

/// Year of a date cell.
///
/// Native date/times give their year directly; text must match
/// `YYYY-MM-DD HH:MM:SS`. Anything else (numbers, booleans, other text) yields
/// `None`.
pub fn extract_year(value: &CellValue) -> Option<i32> {
    match value {
        CellValue::DateTime(dt) => Some(dt.year()),
        CellValue::Text(s) => NaiveDateTime::parse_from_str(s, DATE_TEXT_FORMAT)
            .ok()
            .map(|dt| dt.year()),
        _ => None,
    }
}

/// Parse ISO 8601 datetimes as emitted by calamine for ODS/`DateTimeIso` cells
pub fn parse_iso_datetime(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
