//! Excel input/output
//!
//! - Import: workbook → date and week-number columns
//! - Export: expanded table → `.xlsx` (file or in-memory buffer)

mod exporter;
mod importer;

pub use exporter::OutputWriter;
pub use importer::{convert_cell, SourceReader};
