use thiserror::Error;

pub type ExpandResult<T> = Result<T, ExpandError>;

#[derive(Error, Debug)]
pub enum ExpandError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Source column '{column}' has no values")]
    EmptySource { column: String },

    #[error("Invalid column range {start}:{end} (start is after end)")]
    InvalidRange { start: String, end: String },

    #[error("Invalid column letters: '{0}'")]
    InvalidColumn(String),

    #[error("Label list is empty")]
    EmptyLabels,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Could not read a year from date '{value}' (output row {index})")]
    DateParse { index: usize, value: String },
}
