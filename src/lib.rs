//! sheet-expand - spreadsheet row expander
//!
//! Reads the date and week-number columns of a workbook, repeats every date a
//! configurable number of times, assigns cyclic STATES labels and generates
//! `=[workbook]sheet!$COL$ROW` references into an external workbook.
//!
//! # Example
//!
//! ```no_run
//! use sheet_expand::config::JobConfig;
//! use sheet_expand::excel::OutputWriter;
//! use sheet_expand::job;
//! use std::path::Path;
//!
//! let config = JobConfig::load(Path::new("job.yaml"))?;
//! let output = job::run_file(Path::new("datas.xlsx"), &config)?;
//! OutputWriter::new().save(&output.table, Path::new("dados_expandidos.xlsx"))?;
//!
//! println!("Rows: {}", output.total_rows);
//! # Ok::<(), sheet_expand::error::ExpandError>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod job;
pub mod labels;
pub mod preview;
pub mod types;

// Re-export commonly used types
pub use crate::core::{expand, ColumnRange, ExpansionParams, OnParseError};
pub use error::{ExpandError, ExpandResult};
pub use types::{CellValue, OutputRow, OutputTable, SourceTable};
