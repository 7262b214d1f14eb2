//! YAML job configuration
//!
//! ```yaml
//! source:
//!   sheet: datas
//!   date_column: 3
//!   week_column: 2
//! expansion:
//!   repetitions: 17
//!   target_sheet_name: sbs_nc_21
//!   value_range: "C:S"
//!   percent_range: [W, AM]
//!   labels_file: states.txt
//! ```

use crate::core::columns::ColumnRange;
use crate::core::dates::OnParseError;
use crate::core::expander::{ExpansionParams, DEFAULT_EXTERNAL_WORKBOOK};
use crate::error::{ExpandError, ExpandResult};
use crate::labels;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the date and week-number columns live in the input workbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSpec {
    pub sheet: String,
    /// 1-based column index of the dates
    pub date_column: usize,
    /// 1-based column index of the week numbers
    pub week_column: usize,
    /// Leading sheet rows to ignore (e.g. a header row)
    pub skip_rows: usize,
}

impl Default for SourceSpec {
    fn default() -> Self {
        Self {
            sheet: "datas".to_string(),
            date_column: 3,
            week_column: 2,
            skip_rows: 0,
        }
    }
}

impl SourceSpec {
    pub fn validate(&self) -> ExpandResult<()> {
        if self.sheet.trim().is_empty() {
            return Err(ExpandError::InvalidParameter(
                "source sheet name is empty".to_string(),
            ));
        }
        if self.date_column == 0 || self.week_column == 0 {
            return Err(ExpandError::InvalidParameter(
                "source column indices are 1-based".to_string(),
            ));
        }
        for column in [self.date_column, self.week_column] {
            if u32::try_from(column - 1).is_err() {
                return Err(ExpandError::InvalidParameter(format!(
                    "source column {} is out of range",
                    column
                )));
            }
        }
        if u32::try_from(self.skip_rows).is_err() {
            return Err(ExpandError::InvalidParameter(format!(
                "skip_rows {} is out of range",
                self.skip_rows
            )));
        }
        Ok(())
    }
}

/// Expansion section of the job file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    pub repetitions: usize,
    pub total_rows: Option<usize>,
    pub target_sheet_name: String,
    pub external_workbook: String,
    pub value_range: ColumnRange,
    pub percent_range: ColumnRange,
    pub value_base_row: u32,
    pub percent_base_row: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    /// Text file with one label per line (relative to the job file)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels_file: Option<PathBuf>,
    pub on_parse_error: OnParseError,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        let params = ExpansionParams::default();
        Self {
            repetitions: params.repetitions,
            total_rows: params.total_rows,
            target_sheet_name: params.target_sheet_name,
            external_workbook: DEFAULT_EXTERNAL_WORKBOOK.to_string(),
            value_range: params.value_range,
            percent_range: params.percent_range,
            value_base_row: params.value_base_row,
            percent_base_row: params.percent_base_row,
            labels: None,
            labels_file: None,
            on_parse_error: params.on_parse_error,
        }
    }
}

impl ExpansionConfig {
    /// Resolve labels and produce engine parameters.
    ///
    /// Inline `labels` win over `labels_file`; with neither, the default list
    /// is used. `base_dir` anchors a relative `labels_file`.
    pub fn to_params(&self, base_dir: &Path) -> ExpandResult<ExpansionParams> {
        let labels = match (&self.labels, &self.labels_file) {
            (Some(list), _) => list.clone(),
            (None, Some(file)) => labels::import_labels(&base_dir.join(file))?,
            (None, None) => labels::default_labels(),
        };

        Ok(ExpansionParams {
            repetitions: self.repetitions,
            labels,
            value_range: self.value_range.clone(),
            percent_range: self.percent_range.clone(),
            value_base_row: self.value_base_row,
            percent_base_row: self.percent_base_row,
            total_rows: self.total_rows,
            target_sheet_name: self.target_sheet_name.clone(),
            external_workbook: self.external_workbook.clone(),
            on_parse_error: self.on_parse_error,
        })
    }
}

/// Complete job: where to read and how to expand
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub source: SourceSpec,
    pub expansion: ExpansionConfig,
    /// Directory of the file this config was loaded from
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl JobConfig {
    /// Load a job file; missing keys take their defaults
    pub fn load(path: &Path) -> ExpandResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> ExpandResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> ExpandResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write the default job file to `path`
    pub fn write_default(path: &Path) -> ExpandResult<()> {
        std::fs::write(path, Self::default().to_yaml()?)?;
        Ok(())
    }

    pub fn params(&self) -> ExpandResult<ExpansionParams> {
        self.expansion.to_params(&self.base_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_upload_form() {
        let config = JobConfig::default();
        assert_eq!(config.source.sheet, "datas");
        assert_eq!(config.source.date_column, 3);
        assert_eq!(config.source.week_column, 2);
        assert_eq!(config.expansion.repetitions, 17);
        assert_eq!(config.expansion.value_range.to_string(), "C:S");
        assert_eq!(config.expansion.percent_range.to_string(), "W:AM");
        assert_eq!(config.expansion.value_base_row, 4);
        assert_eq!(config.expansion.target_sheet_name, "sbs_nc_21");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
source:
  sheet: weeks
expansion:
  repetitions: 2
  value_range: [c, r]
  percent_range: "U:AJ"
  on_parse_error: fail
"#;
        let config = JobConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.source.sheet, "weeks");
        assert_eq!(config.source.date_column, 3);
        assert_eq!(config.expansion.repetitions, 2);
        assert_eq!(config.expansion.value_range, ColumnRange::new("C", "R"));
        assert_eq!(config.expansion.on_parse_error, OnParseError::Fail);
        assert_eq!(config.expansion.value_base_row, 4);
    }

    #[test]
    fn test_invalid_range_in_yaml() {
        let yaml = "expansion:\n  value_range: \"C:4\"\n";
        assert!(JobConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(JobConfig::from_yaml("  \n").unwrap(), JobConfig::default());
    }

    #[test]
    fn test_labels_file_relative_to_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("states.txt"), "Bahia\nGoiás\n").unwrap();
        let config_path = dir.path().join("job.yaml");
        fs::write(&config_path, "expansion:\n  labels_file: states.txt\n").unwrap();

        let config = JobConfig::load(&config_path).unwrap();
        let params = config.params().unwrap();
        assert_eq!(params.labels, vec!["Bahia", "Goiás"]);
    }

    #[test]
    fn test_inline_labels_win() {
        let mut config = JobConfig::default();
        config.expansion.labels = Some(vec!["X".to_string()]);
        config.expansion.labels_file = Some(PathBuf::from("missing.txt"));
        assert_eq!(config.params().unwrap().labels, vec!["X"]);
    }

    #[test]
    fn test_write_default_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job.yaml");
        JobConfig::write_default(&path).unwrap();
        let loaded = JobConfig::load(&path).unwrap();
        assert_eq!(loaded.source, SourceSpec::default());
        assert_eq!(loaded.expansion, ExpansionConfig::default());
    }

    #[test]
    fn test_source_spec_validate() {
        assert!(SourceSpec::default().validate().is_ok());
        let zero = SourceSpec {
            date_column: 0,
            ..SourceSpec::default()
        };
        assert!(zero.validate().is_err());

        let too_wide = SourceSpec {
            week_column: u32::MAX as usize + 2,
            ..SourceSpec::default()
        };
        assert!(matches!(
            too_wide.validate(),
            Err(ExpandError::InvalidParameter(msg)) if msg.contains("out of range")
        ));

        let widest = SourceSpec {
            date_column: u32::MAX as usize + 1,
            ..SourceSpec::default()
        };
        assert!(widest.validate().is_ok());
    }
}
