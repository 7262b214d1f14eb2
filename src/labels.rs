//! STATES label list
//!
//! The label list is a plain value. Every editing operation returns a new list
//! instead of mutating shared state.

use crate::error::{ExpandError, ExpandResult};
use std::path::Path;

const DEFAULT_LABELS: [&str; 17] = [
    "Mato Grosso",
    "MT N",
    "MT S",
    "MT O",
    "MT L",
    "Rio Grande",
    "Paraná",
    "Goiás",
    "M. T. do Sul",
    "Santa Catarina",
    "Minas Gerais",
    "São Paulo",
    "Bahia",
    "Tocantins",
    "Piauí",
    "Maranhão",
    "Others",
];

/// Maximum caption length used by [`summarize`] in the CLI and API
pub const SUMMARY_MAX_CHARS: usize = 100;

pub fn default_labels() -> Vec<String> {
    DEFAULT_LABELS.iter().map(|s| s.to_string()).collect()
}

/// Same as [`default_labels`]; named for the "reset" action
pub fn reset_labels() -> Vec<String> {
    default_labels()
}

/// One label per line; surrounding whitespace trimmed, blank lines dropped
pub fn parse_labels(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Append `label` (trimmed). Blank input leaves the list as it was.
pub fn add_label(labels: &[String], label: &str) -> Vec<String> {
    let mut result = labels.to_vec();
    let trimmed = label.trim();
    if !trimmed.is_empty() {
        result.push(trimmed.to_string());
    }
    result
}

/// Read a UTF-8 text or CSV file with one label per line
pub fn import_labels(path: &Path) -> ExpandResult<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let labels = parse_labels(&content);
    if labels.is_empty() {
        return Err(ExpandError::EmptyLabels);
    }
    Ok(labels)
}

/// Comma-separated caption, cut at `max_chars` characters with a trailing `...`
pub fn summarize(labels: &[String], max_chars: usize) -> String {
    let joined = labels.join(", ");
    if joined.chars().count() < max_chars {
        joined
    } else {
        let cut: String = joined.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_labels() {
        let labels = default_labels();
        assert_eq!(labels.len(), 17);
        assert_eq!(labels[0], "Mato Grosso");
        assert_eq!(labels[16], "Others");
        assert_eq!(reset_labels(), labels);
    }

    #[test]
    fn test_parse_labels() {
        let labels = parse_labels("  Bahia \n\n Piauí\r\n   \nOthers");
        assert_eq!(labels, vec!["Bahia", "Piauí", "Others"]);
        assert!(parse_labels("\n  \n").is_empty());
    }

    #[test]
    fn test_add_label_returns_new_list() {
        let original = vec!["Bahia".to_string()];
        let added = add_label(&original, "  Goiás ");
        assert_eq!(original.len(), 1);
        assert_eq!(added, vec!["Bahia", "Goiás"]);

        let unchanged = add_label(&original, "   ");
        assert_eq!(unchanged, original);
    }

    #[test]
    fn test_import_labels() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Paraná\nSão Paulo\n").unwrap();
        let labels = import_labels(file.path()).unwrap();
        assert_eq!(labels, vec!["Paraná", "São Paulo"]);
    }

    #[test]
    fn test_import_empty_file_fails() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            import_labels(file.path()),
            Err(ExpandError::EmptyLabels)
        ));
    }

    #[test]
    fn test_summarize() {
        let short = vec!["A".to_string(), "B".to_string()];
        assert_eq!(summarize(&short, SUMMARY_MAX_CHARS), "A, B");

        let long = summarize(&default_labels(), SUMMARY_MAX_CHARS);
        assert!(long.ends_with("..."));
        assert_eq!(long.chars().count(), SUMMARY_MAX_CHARS + 3);
    }
}
