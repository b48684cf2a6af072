//! Upload of a workbook to the external analysis endpoint.
//!
//! One multipart POST per explicit user action; no retry, no cancellation.
//! Non-2xx responses surface the upstream `detail` message verbatim when the
//! body carries one, otherwise the HTTP status line.

use thiserror::Error;

use super::payload::AnalysisResult;

/// Default dev endpoint; override at build time with `SHEETSENSE_API_URL`.
const DEFAULT_ENDPOINT: &str = "http://localhost:8000/ai/analyze-excel/";

pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const MIME_XLS: &str = "application/vnd.ms-excel";

pub const INVALID_FILE_MESSAGE: &str = "Please upload an Excel file (.xlsx or .xls)";

pub fn endpoint() -> &'static str {
    option_env!("SHEETSENSE_API_URL").unwrap_or(DEFAULT_ENDPOINT)
}

#[derive(Debug, Error)]
pub enum UploadError {
    /// The upstream service refused the workbook; message is user-facing.
    #[error("{0}")]
    Rejected(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("analysis response was not valid JSON: {0}")]
    Decode(String),
}

/// Pre-flight acceptance check: spreadsheet MIME type or extension.
pub fn is_spreadsheet(file_name: &str, mime: Option<&str>) -> bool {
    if matches!(mime, Some(MIME_XLSX) | Some(MIME_XLS)) {
        return true;
    }
    let lower = file_name.to_ascii_lowercase();
    lower.ends_with(".xlsx") || lower.ends_with(".xls")
}

fn mime_for(file_name: &str) -> &'static str {
    if file_name.to_ascii_lowercase().ends_with(".xls") {
        MIME_XLS
    } else {
        MIME_XLSX
    }
}

/// Send the workbook for analysis and decode the result payload.
pub async fn analyze_workbook(
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<AnalysisResult, UploadError> {
    let part = reqwest::multipart::Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str(mime_for(file_name))
        .map_err(|err| UploadError::Transport(err.to_string()))?;
    let form = reqwest::multipart::Form::new().part("file", part);

    let response = reqwest::Client::new()
        .post(endpoint())
        .multipart(form)
        .send()
        .await
        .map_err(|err| UploadError::Transport(err.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| UploadError::Transport(err.to_string()))?;

    if !status.is_success() {
        tracing::warn!(%status, "analysis endpoint rejected upload");
        return Err(UploadError::Rejected(rejection_message(
            status.as_u16(),
            status.canonical_reason().unwrap_or("request failed"),
            &body,
        )));
    }

    serde_json::from_str(&body).map_err(|err| UploadError::Decode(err.to_string()))
}

/// User-facing message for a non-2xx response: prefer the JSON body's
/// `detail` field, fall back to the status line.
pub(crate) fn rejection_message(status: u16, reason: &str, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned())
        .and_then(|detail| detail.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("Analysis failed: {status} {reason}"))
}
