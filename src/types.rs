use chrono::NaiveDateTime;
use std::fmt;

//==============================================================================
// Cell values
//==============================================================================

/// A single spreadsheet cell, reduced to the types the expander cares about
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    /// Native date/time (Excel serial dates are converted on import)
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

//==============================================================================
// Source table
//==============================================================================

/// Date and week-number columns of the input sheet.
///
/// Each sequence keeps only the non-empty cells of its column, in sheet order.
/// The two are independent: position `k` in `dates` does not have to come from
/// the same sheet row as position `k` in `week_numbers`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTable {
    pub dates: Vec<CellValue>,
    pub week_numbers: Vec<CellValue>,
}

impl SourceTable {
    pub fn new(dates: Vec<CellValue>, week_numbers: Vec<CellValue>) -> Self {
        Self {
            dates,
            week_numbers,
        }
    }
}

//==============================================================================
// Output table
//==============================================================================

pub const OUTPUT_SHEET_NAME: &str = "dados_expandido";

/// Data rows that fit below the header in an xlsx sheet (1,048,576 rows total)
pub const MAX_OUTPUT_ROWS: usize = 1_048_575;

pub const OUTPUT_HEADERS: [&str; 8] = [
    "WEEK_NUMBER",
    "YEAR",
    "DATA",
    "COUNTRY",
    "STATES",
    "VALOR",
    "TIPO",
    "PERCENT",
];

pub const COUNTRY: &str = "BRAZIL";
pub const KIND: &str = "KMT";

/// One expanded row (column order matches `OUTPUT_HEADERS`)
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub week_number: CellValue,
    /// `None` when the date could not be read as a date
    pub year: Option<i32>,
    pub date: CellValue,
    pub country: &'static str,
    pub state: String,
    pub value_ref: String,
    pub kind: &'static str,
    pub percent_ref: String,
}

impl OutputRow {
    /// Render every field as display text, in header order
    pub fn to_strings(&self) -> Vec<String> {
        vec![
            self.week_number.to_string(),
            self.year.map(|y| y.to_string()).unwrap_or_default(),
            self.date.to_string(),
            self.country.to_string(),
            self.state.clone(),
            self.value_ref.clone(),
            self.kind.to_string(),
            self.percent_ref.clone(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputTable {
    pub rows: Vec<OutputRow>,
}

impl OutputTable {
    pub fn headers(&self) -> &'static [&'static str; 8] {
        &OUTPUT_HEADERS
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
