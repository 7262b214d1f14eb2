//! Preview of an expanded table: the first rows plus summary figures

use crate::types::{OutputTable, OUTPUT_HEADERS};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PREVIEW_ROWS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
    pub label_count: usize,
}

impl Preview {
    pub fn from_table(
        table: &OutputTable,
        total_rows: usize,
        label_count: usize,
        limit: usize,
    ) -> Self {
        Self {
            headers: OUTPUT_HEADERS.iter().map(|h| h.to_string()).collect(),
            rows: table.rows.iter().take(limit).map(|r| r.to_strings()).collect(),
            total_rows,
            label_count,
        }
    }

    /// Fixed-width text rendering for terminals
    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (idx, field) in row.iter().enumerate() {
                widths[idx] = widths[idx].max(field.chars().count());
            }
        }

        let format_line = |fields: &[String]| -> String {
            fields
                .iter()
                .zip(&widths)
                .map(|(field, width)| format!("{:<width$}", field, width = *width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        out.push_str(&format_line(&self.headers));
        out.push('\n');
        out.push_str(
            &widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("  "),
        );
        out.push('\n');
        for row in &self.rows {
            out.push_str(&format_line(row));
            out.push('\n');
        }
        out
    }
}
