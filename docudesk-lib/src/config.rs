//! Runtime configuration
//!
//! The console reads a `config.json` once at startup and passes the
//! resulting [`AppConfig`] to whatever needs it. A missing or broken
//! config never stops startup: the built-in defaults are used and a
//! warning is logged.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::error::ConfigError;
use crate::error::FieldValidationError;
use crate::error::ValidationError;

/// Default API base URL when no config is available.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Where to load the configuration document from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Fetch over HTTP, like the browser console's `/config.json`.
    Url(Url),
    /// Read from the local filesystem.
    File(PathBuf),
}

impl ConfigSource {
    /// Interprets a string as a URL when it has an `http(s)` scheme, and as
    /// a file path otherwise.
    pub fn parse(value: &str) -> Self {
        match Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Url(url),
            _ => Self::File(PathBuf::from(value)),
        }
    }
}

/// Settings the console needs before it can do anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the REST API.
    #[serde(rename = "API_BASE_URL")]
    pub api_base_url: String,
    /// Domain used to build reception mailbox addresses.
    #[serde(rename = "RECEPTION_EMAIL_DOMAIN")]
    pub reception_email_domain: String,
    /// Maximum number of files accepted by a single upload.
    #[serde(rename = "MAX_UPLOAD_FILES")]
    pub max_upload_files: usize,
    /// Accepted upload types, as extensions (`.pdf`) or MIME types (`image/png`).
    #[serde(rename = "ALLOWED_FILE_TYPES")]
    pub allowed_file_types: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            reception_email_domain: "reception.local".to_string(),
            max_upload_files: 10,
            allowed_file_types: vec![
                ".pdf".to_string(),
                ".png".to_string(),
                ".jpg".to_string(),
                ".jpeg".to_string(),
            ],
        }
    }
}

impl AppConfig {
    /// Loads the configuration, falling back to defaults on any failure.
    pub async fn load(source: &ConfigSource) -> Self {
        match Self::try_load(source).await {
            Ok(config) => {
                log::debug!("loaded config from {source:?}");
                config
            }
            Err(e) => {
                log::warn!("{e}; using built-in defaults");
                Self::default()
            }
        }
    }

    /// Loads the configuration, reporting failures.
    pub async fn try_load(source: &ConfigSource) -> Result<Self, ConfigError> {
        let text = match source {
            ConfigSource::Url(url) => fetch(url).await?,
            ConfigSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| ConfigError::Read {
                        path: path.display().to_string(),
                        source,
                    })?
            }
        };
        Self::from_json(&text)
    }

    /// Parses a configuration document. Absent keys take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Returns the reception mailbox address for a local part.
    pub fn reception_email(&self, local_part: &str) -> String {
        format!("{}@{}", local_part, self.reception_email_domain.trim_start_matches('@'))
    }

    /// Returns `true` if a file name matches one of the allowed types.
    pub fn is_allowed_file(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = normalize_type(ext);
        self.allowed_file_types
            .iter()
            .any(|allowed| normalize_type(allowed) == ext)
    }

    /// Checks a batch of files against the upload limits.
    pub fn validate_upload(&self, files: &[PathBuf]) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if files.is_empty() {
            errors.push(FieldValidationError::new("files", "Select at least one file"));
        }
        if files.len() > self.max_upload_files {
            errors.push(FieldValidationError::new(
                "files",
                format!("At most {} files can be uploaded at once", self.max_upload_files),
            ));
        }
        for file in files.iter().filter(|f| !self.is_allowed_file(f)) {
            errors.push(FieldValidationError::new(
                "files",
                format!("{} is not an allowed file type", file.display()),
            ));
        }

        ValidationError::check(errors)
    }
}

async fn fetch(url: &Url) -> Result<String, ConfigError> {
    let fail = |message: String| ConfigError::Fetch {
        url: url.to_string(),
        message,
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| fail(e.to_string()))?;
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| fail(e.to_string()))?;
    if !response.status().is_success() {
        return Err(fail(format!("HTTP {}", response.status().as_u16())));
    }
    response.text().await.map_err(|e| fail(e.to_string()))
}

/// Reduces `.PDF`, `pdf` and `application/pdf` to `pdf`; `jpeg` becomes `jpg`.
fn normalize_type(value: &str) -> String {
    let value = value.trim().to_ascii_lowercase();
    let value = value.rsplit('/').next().unwrap_or(value.as_str());
    let value = value.trim_start_matches('.');
    match value {
        "jpeg" => "jpg".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config = AppConfig::from_json(r#"{"API_BASE_URL":"https://x.example/api"}"#).unwrap();
        assert_eq!(config.api_base_url, "https://x.example/api");
        assert_eq!(config.max_upload_files, AppConfig::default().max_upload_files);
    }

    #[test]
    fn source_parse_distinguishes_urls_and_paths() {
        assert!(matches!(
            ConfigSource::parse("https://console.example.com/config.json"),
            ConfigSource::Url(_)
        ));
        assert!(matches!(ConfigSource::parse("./config.json"), ConfigSource::File(_)));
    }

    #[test]
    fn allowed_types_accept_extensions_and_mime_types() {
        let config = AppConfig {
            allowed_file_types: vec!["application/pdf".into(), "image/jpeg".into()],
            ..Default::default()
        };
        assert!(config.is_allowed_file(Path::new("scan.PDF")));
        assert!(config.is_allowed_file(Path::new("photo.jpg")));
        assert!(!config.is_allowed_file(Path::new("notes.txt")));
        assert!(!config.is_allowed_file(Path::new("no_extension")));
    }

    #[test]
    fn upload_validation_reports_count_and_types() {
        let config = AppConfig {
            max_upload_files: 1,
            ..Default::default()
        };
        let files = vec![PathBuf::from("a.pdf"), PathBuf::from("b.exe")];
        let err = config.validate_upload(&files).unwrap_err();
        assert_eq!(err.fields.len(), 2);
        assert!(config.validate_upload(&[PathBuf::from("a.pdf")]).is_ok());
    }

    #[test]
    fn reception_email_joins_domain() {
        let config = AppConfig {
            reception_email_domain: "@clinic.example".into(),
            ..Default::default()
        };
        assert_eq!(config.reception_email("front-desk"), "front-desk@clinic.example");
    }

    #[tokio::test]
    async fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"MAX_UPLOAD_FILES": 3}}"#).unwrap();
        let config = AppConfig::load(&ConfigSource::File(file.path().to_path_buf())).await;
        assert_eq!(config.max_upload_files, 3);
    }

    #[tokio::test]
    async fn load_falls_back_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = ConfigSource::File(dir.path().join("absent.json"));
        assert!(AppConfig::try_load(&source).await.is_err());
        assert_eq!(AppConfig::load(&source).await, AppConfig::default());
    }

    #[tokio::test]
    async fn load_falls_back_on_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let config = AppConfig::load(&ConfigSource::File(file.path().to_path_buf())).await;
        assert_eq!(config, AppConfig::default());
    }
}
