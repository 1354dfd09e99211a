//! Document export

use std::path::Path;
use std::path::PathBuf;

use chrono::DateTime;
use chrono::Local;
use chrono::TimeZone;
use reqwest::Method;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderName;
use serde::Serialize;

use crate::ConsoleClient;
use crate::error::ApiError;
use crate::error::Error;
use crate::error::ValidationError;
use crate::model::DocumentId;
use crate::model::DocumentType;

/// File format of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            other => Err(format!("unknown export format '{other}'")),
        }
    }
}

/// Body of `POST /documents/export`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRequest {
    pub document_ids: Vec<DocumentId>,
    pub format: ExportFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
}

impl ExportRequest {
    pub fn new(document_ids: Vec<DocumentId>, format: ExportFormat) -> Self {
        Self {
            document_ids,
            format,
            fields: None,
            document_type: None,
        }
    }

    /// Restricts the export to these extracted fields.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn document_type(mut self, document_type: DocumentType) -> Self {
        self.document_type = Some(document_type);
        self
    }
}

/// A downloaded export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    /// Writes the file into `dir`, returning its path.
    pub async fn save_in(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join(&self.filename);
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(path)
    }
}

/// `documents_export_20240301_093000.csv`
pub fn export_filename<Tz: TimeZone>(format: ExportFormat, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "documents_export_{}.{}",
        at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

fn header_value(response: &reqwest::Response, name: HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Extracts a plain `filename="..."` from a Content-Disposition value.
fn disposition_filename(value: &str) -> Option<String> {
    value.split(';').find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let name = value.trim().trim_matches('"');
        let name = Path::new(name).file_name()?.to_str()?;
        (!name.is_empty()).then(|| name.to_string())
    })
}

impl ConsoleClient {
    /// Exports documents as a spreadsheet.
    ///
    /// The server's `Content-Disposition` filename is used when present;
    /// otherwise one is generated from the current local time.
    ///
    /// `POST /documents/export`
    pub async fn export_documents(&self, request: &ExportRequest) -> Result<ExportFile, Error> {
        if request.document_ids.is_empty() {
            return Err(ValidationError::single("document_ids", "Select at least one document").into());
        }

        let url = self.endpoint(&["documents", "export"])?;
        let body = serde_json::to_value(request).map_err(|e| ApiError::parse(e.to_string()))?;
        let response = self.request(Method::POST, url, Some(body)).await?;

        let filename = header_value(&response, CONTENT_DISPOSITION)
            .and_then(|v| disposition_filename(&v))
            .unwrap_or_else(|| export_filename(request.format, &Local::now()));
        let content_type = header_value(&response, CONTENT_TYPE)
            .unwrap_or_else(|| request.format.content_type().to_string());

        let bytes = response.bytes().await.map_err(ApiError::from)?;
        log::debug!("exported {} bytes as {filename}", bytes.len());

        Ok(ExportFile {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}
