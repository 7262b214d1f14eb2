//! API request handlers

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::config::JobConfig;
use crate::core::columns::ColumnRange;
use crate::core::dates::OnParseError;
use crate::error::{ExpandError, ExpandResult};
use crate::excel::OutputWriter;
use crate::job::{self, JobOutput};
use crate::labels;
use crate::preview::{Preview, DEFAULT_PREVIEW_ROWS};

use super::server::AppState;

/// File name offered for the expanded workbook download
pub const DOWNLOAD_FILE_NAME: &str = "dados_expandidos.xlsx";

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Header carrying the number of generated rows on downloads
pub const TOTAL_ROWS_HEADER: &str = "x-total-rows";

/// Standard API response wrapper
#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Root endpoint response
#[derive(Serialize, Deserialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize, Deserialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

fn endpoint(path: &str, method: &str, description: &str) -> EndpointInfo {
    EndpointInfo {
        path: path.to_string(),
        method: method.to_string(),
        description: description.to_string(),
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(RootResponse {
        name: "sheet-expand API server".to_string(),
        version: state.version.clone(),
        description: "Spreadsheet row expansion with external workbook references".to_string(),
        endpoints: vec![
            endpoint("/health", "GET", "Health check endpoint"),
            endpoint("/version", "GET", "Get server version"),
            endpoint(
                "/api/v1/expand",
                "POST",
                "Expand a workbook on the server's filesystem",
            ),
            endpoint(
                "/api/v1/expand/upload",
                "POST",
                "Upload a workbook and download the expanded .xlsx",
            ),
            endpoint("/api/v1/labels", "POST", "Edit a STATES label list"),
        ],
    }))
}

/// Health check response
#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
    }))
}

/// Version response
#[derive(Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec![
            "expand".to_string(),
            "upload".to_string(),
            "labels".to_string(),
        ],
    }))
}

/// Expand request (paths on the server)
#[derive(Deserialize)]
pub struct ExpandRequest {
    pub input_path: String,
    pub output_path: String,
    #[serde(default)]
    pub config: Option<JobConfig>,
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

fn default_preview_rows() -> usize {
    DEFAULT_PREVIEW_ROWS
}

/// Expand response
#[derive(Serialize, Deserialize)]
pub struct ExpandResponse {
    pub expanded: bool,
    pub input_path: String,
    pub output_path: String,
    pub total_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<Preview>,
    pub message: String,
}

/// POST /api/v1/expand - Expand a workbook and save the result
pub async fn expand(Json(req): Json<ExpandRequest>) -> impl IntoResponse {
    let input = PathBuf::from(&req.input_path);
    let output = PathBuf::from(&req.output_path);
    let config = req.config.unwrap_or_default();
    let preview_rows = req.preview_rows;

    let result = run_blocking(move || {
        let result = job::run_file(&input, &config)?;
        OutputWriter::new().save(&result.table, &output)?;
        Ok(result)
    })
    .await;

    match result {
        Ok(result) => Json(ApiResponse::ok(ExpandResponse {
            expanded: true,
            input_path: req.input_path,
            output_path: req.output_path,
            total_rows: result.total_rows,
            preview: Some(preview_of(&result, preview_rows)),
            message: "Expansion completed".to_string(),
        })),
        Err(e) => Json(ApiResponse::ok(ExpandResponse {
            expanded: false,
            input_path: req.input_path,
            output_path: req.output_path,
            total_rows: 0,
            preview: None,
            message: format!("Error: {}", e),
        })),
    }
}

/// Query parameters of the upload endpoint (all optional)
#[derive(Debug, Default, Deserialize)]
pub struct UploadParams {
    pub sheet: Option<String>,
    pub date_column: Option<usize>,
    pub week_column: Option<usize>,
    pub skip_rows: Option<usize>,
    pub repetitions: Option<usize>,
    pub total_rows: Option<usize>,
    pub target_sheet: Option<String>,
    pub external_workbook: Option<String>,
    pub value_range: Option<String>,
    pub percent_range: Option<String>,
    pub value_base_row: Option<u32>,
    pub percent_base_row: Option<u32>,
    /// One label per line
    pub labels: Option<String>,
    #[serde(default)]
    pub strict_dates: bool,
}

impl UploadParams {
    /// Apply the query parameters on top of the default job
    pub fn to_config(&self) -> ExpandResult<JobConfig> {
        let mut config = JobConfig::default();

        if let Some(sheet) = &self.sheet {
            config.source.sheet = sheet.clone();
        }
        if let Some(col) = self.date_column {
            config.source.date_column = col;
        }
        if let Some(col) = self.week_column {
            config.source.week_column = col;
        }
        if let Some(rows) = self.skip_rows {
            config.source.skip_rows = rows;
        }

        let expansion = &mut config.expansion;
        if let Some(reps) = self.repetitions {
            expansion.repetitions = reps;
        }
        expansion.total_rows = self.total_rows;
        if let Some(sheet) = &self.target_sheet {
            expansion.target_sheet_name = sheet.clone();
        }
        if let Some(workbook) = &self.external_workbook {
            expansion.external_workbook = workbook.clone();
        }
        if let Some(range) = &self.value_range {
            expansion.value_range = range.parse::<ColumnRange>()?;
        }
        if let Some(range) = &self.percent_range {
            expansion.percent_range = range.parse::<ColumnRange>()?;
        }
        if let Some(row) = self.value_base_row {
            expansion.value_base_row = row;
        }
        if let Some(row) = self.percent_base_row {
            expansion.percent_base_row = row;
        }
        if let Some(text) = &self.labels {
            expansion.labels = Some(labels::parse_labels(text));
        }
        if self.strict_dates {
            expansion.on_parse_error = OnParseError::Fail;
        }

        Ok(config)
    }
}

/// POST /api/v1/expand/upload - Expand an uploaded workbook, respond with the .xlsx
pub async fn expand_upload(Query(params): Query<UploadParams>, body: Bytes) -> Response {
    let config = match params.to_config() {
        Ok(config) => config,
        Err(e) => return bad_request(e),
    };

    let bytes = body.to_vec();
    let result = run_blocking(move || {
        let result = job::run_bytes(bytes, &config)?;
        let buffer = OutputWriter::new().to_buffer(&result.table)?;
        Ok((result.total_rows, buffer))
    })
    .await;

    match result {
        Ok((total_rows, buffer)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", DOWNLOAD_FILE_NAME),
                ),
                (
                    HeaderName::from_static(TOTAL_ROWS_HEADER),
                    total_rows.to_string(),
                ),
            ],
            buffer,
        )
            .into_response(),
        Err(e) => bad_request(e),
    }
}

/// Label edit request
#[derive(Debug, Default, Deserialize)]
pub struct LabelsRequest {
    /// Current list as text, one label per line (defaults when absent)
    pub text: Option<String>,
    #[serde(default)]
    pub add: Vec<String>,
    #[serde(default)]
    pub reset: bool,
}

/// Label edit response
#[derive(Serialize, Deserialize)]
pub struct LabelsResponse {
    pub labels: Vec<String>,
    pub count: usize,
    pub summary: String,
}

/// POST /api/v1/labels - Apply label edits and return the new list
pub async fn labels(Json(req): Json<LabelsRequest>) -> impl IntoResponse {
    let mut list = match (&req.text, req.reset) {
        (_, true) => labels::reset_labels(),
        (Some(text), false) => labels::parse_labels(text),
        (None, false) => labels::default_labels(),
    };
    for label in &req.add {
        list = labels::add_label(&list, label);
    }

    Json(ApiResponse::ok(LabelsResponse {
        count: list.len(),
        summary: labels::summarize(&list, labels::SUMMARY_MAX_CHARS),
        labels: list,
    }))
}

fn preview_of(result: &JobOutput, rows: usize) -> Preview {
    Preview::from_table(&result.table, result.total_rows, result.label_count, rows)
}

fn bad_request(error: ExpandError) -> Response {
    warn!(%error, "expansion request rejected");
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::err(error.to_string())),
    )
        .into_response()
}

/// Run a blocking expansion off the async workers
async fn run_blocking<T, F>(f: F) -> ExpandResult<T>
where
    F: FnOnce() -> ExpandResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ExpandError::Export(format!("Expansion task failed: {}", e)))?
}
