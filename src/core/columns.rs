//! Spreadsheet column letters and column ranges

use crate::error::{ExpandError, ExpandResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Last column of an .xlsx sheet (XFD)
pub const MAX_COLUMN: usize = 16_384;

/// Convert column letters to a 1-based column index (A → 1, Z → 26, AA → 27)
pub fn column_letter_to_index(letters: &str) -> ExpandResult<usize> {
    let trimmed = letters.trim();
    if trimmed.is_empty() {
        return Err(ExpandError::InvalidColumn(letters.to_string()));
    }

    let mut index: usize = 0;
    for c in trimmed.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(ExpandError::InvalidColumn(letters.to_string()));
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index * 26 + digit;
        if index > MAX_COLUMN {
            return Err(ExpandError::InvalidColumn(letters.to_string()));
        }
    }

    Ok(index)
}

/// Convert a 1-based column index to letters (1 → A, 26 → Z, 27 → AA)
pub fn column_index_to_letter(index: usize) -> String {
    let mut result = String::new();
    let mut idx = index;

    while idx > 0 {
        let remainder = (idx - 1) % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        idx = (idx - 1) / 26;
    }

    result
}

/// Inclusive range of column letters, e.g. `C:R`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RangeRepr", into = "String")]
pub struct ColumnRange {
    start: String,
    end: String,
}

impl ColumnRange {
    /// Build a range from two column letters. Letters are upper-cased; they
    /// are checked when the range is resolved with [`ColumnRange::columns`].
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into().trim().to_ascii_uppercase(),
            end: end.into().trim().to_ascii_uppercase(),
        }
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    /// Ordered column letters from start to end, both inclusive
    pub fn columns(&self) -> ExpandResult<Vec<String>> {
        let first = column_letter_to_index(&self.start)?;
        let last = column_letter_to_index(&self.end)?;

        if first > last {
            return Err(ExpandError::InvalidRange {
                start: self.start.clone(),
                end: self.end.clone(),
            });
        }

        Ok((first..=last).map(column_index_to_letter).collect())
    }

    /// Number of columns in the range (`end - start + 1`)
    pub fn len(&self) -> ExpandResult<usize> {
        Ok(self.columns()?.len())
    }
}

impl fmt::Display for ColumnRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl FromStr for ColumnRange {
    type Err = ExpandError;

    /// Parse `C:R` (a single letter `C` means `C:C`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let range = match s.split_once(':') {
            Some((start, end)) => ColumnRange::new(start, end),
            None => ColumnRange::new(s, s),
        };
        // Reject garbage early; ordering is checked at resolution time
        column_letter_to_index(&range.start)?;
        column_letter_to_index(&range.end)?;
        Ok(range)
    }
}

impl From<ColumnRange> for String {
    fn from(range: ColumnRange) -> Self {
        range.to_string()
    }
}

/// Accepted YAML shapes: `"C:R"` or `[C, R]`
#[derive(Deserialize)]
#[serde(untagged)]
enum RangeRepr {
    Text(String),
    Pair(String, String),
}

impl TryFrom<RangeRepr> for ColumnRange {
    type Error = ExpandError;

    fn try_from(repr: RangeRepr) -> Result<Self, Self::Error> {
        match repr {
            RangeRepr::Text(s) => s.parse(),
            RangeRepr::Pair(start, end) => format!("{}:{}", start, end).parse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letter_to_index() {
        assert_eq!(column_letter_to_index("A").unwrap(), 1);
        assert_eq!(column_letter_to_index("c").unwrap(), 3);
        assert_eq!(column_letter_to_index("Z").unwrap(), 26);
        assert_eq!(column_letter_to_index("AA").unwrap(), 27);
        assert_eq!(column_letter_to_index("AJ").unwrap(), 36);
        assert_eq!(column_letter_to_index("XFD").unwrap(), MAX_COLUMN);
    }

    #[test]
    fn test_column_letter_to_index_invalid() {
        assert!(column_letter_to_index("").is_err());
        assert!(column_letter_to_index("A1").is_err());
        assert!(column_letter_to_index("XFE").is_err());
    }

    #[test]
    fn test_column_index_to_letter() {
        assert_eq!(column_index_to_letter(1), "A");
        assert_eq!(column_index_to_letter(26), "Z");
        assert_eq!(column_index_to_letter(27), "AA");
        assert_eq!(column_index_to_letter(52), "AZ");
        assert_eq!(column_index_to_letter(53), "BA");
        assert_eq!(column_index_to_letter(702), "ZZ");
        assert_eq!(column_index_to_letter(703), "AAA");
    }

    #[test]
    fn test_range_columns() {
        let range = ColumnRange::new("C", "R");
        let cols = range.columns().unwrap();
        assert_eq!(cols.len(), 16);
        assert_eq!(cols.first().unwrap(), "C");
        assert_eq!(cols.last().unwrap(), "R");

        let crossing = ColumnRange::new("y", "ab");
        assert_eq!(crossing.columns().unwrap(), vec!["Y", "Z", "AA", "AB"]);
    }

    #[test]
    fn test_range_reversed_is_invalid() {
        let range = ColumnRange::new("R", "C");
        match range.columns() {
            Err(ExpandError::InvalidRange { start, end }) => {
                assert_eq!(start, "R");
                assert_eq!(end, "C");
            }
            other => panic!("Expected InvalidRange, got {:?}", other),
        }
    }

    #[test]
    fn test_range_parse() {
        let range: ColumnRange = "u:aj".parse().unwrap();
        assert_eq!(range.start(), "U");
        assert_eq!(range.end(), "AJ");
        assert_eq!(range.len().unwrap(), 16);

        let single: ColumnRange = "D".parse().unwrap();
        assert_eq!(single.len().unwrap(), 1);

        assert!("C:4".parse::<ColumnRange>().is_err());
    }

    #[test]
    fn test_range_yaml_shapes() {
        let text: ColumnRange = serde_yaml::from_str("\"C:S\"").unwrap();
        let pair: ColumnRange = serde_yaml::from_str("[C, S]").unwrap();
        assert_eq!(text, pair);
        let written = serde_yaml::to_string(&text).unwrap();
        let reread: ColumnRange = serde_yaml::from_str(&written).unwrap();
        assert_eq!(reread, text);
    }
}
