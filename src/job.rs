//! End-to-end expansion job: read the source, expand, hand back the table

use crate::config::JobConfig;
use crate::core::expander::expand;
use crate::error::ExpandResult;
use crate::excel::SourceReader;
use crate::types::{OutputTable, SourceTable};
use std::path::Path;
use tracing::info;

/// Result of a job, as handed to the presentation side
#[derive(Debug, Clone)]
pub struct JobOutput {
    pub table: OutputTable,
    pub total_rows: usize,
    pub label_count: usize,
}

/// Expand a workbook on disk
pub fn run_file(input: &Path, config: &JobConfig) -> ExpandResult<JobOutput> {
    let source = SourceReader::new(config.source.clone()).read_path(input)?;
    run_source(&source, config)
}

/// Expand an uploaded workbook
pub fn run_bytes(bytes: Vec<u8>, config: &JobConfig) -> ExpandResult<JobOutput> {
    let source = SourceReader::new(config.source.clone()).read_bytes(bytes)?;
    run_source(&source, config)
}

fn run_source(source: &SourceTable, config: &JobConfig) -> ExpandResult<JobOutput> {
    let params = config.params()?;
    let (table, total_rows) = expand(source, &params)?;
    info!(
        total_rows,
        labels = params.labels.len(),
        "expansion complete"
    );
    Ok(JobOutput {
        table,
        total_rows,
        label_count: params.labels.len(),
    })
}
