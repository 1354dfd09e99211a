//! Folder model

use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::FolderId;
use super::de;
use super::format_timestamp;
use crate::error::FieldValidationError;
use crate::error::ValidationError;
use crate::table::ColumnKey;
use crate::table::TableRecord;

/// Longest accepted folder name.
pub const MAX_FOLDER_NAME_LEN: usize = 255;

/// Kind of documents a folder collects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    #[default]
    Invoice,
    Receipt,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Receipt => "receipt",
        }
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "invoice" => Ok(Self::Invoice),
            "receipt" => Ok(Self::Receipt),
            other => Err(format!("unknown document type '{other}'")),
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a folder still accepts documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderStatus {
    #[default]
    Active,
    Archived,
}

impl FolderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

impl FromStr for FolderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            other => Err(format!("unknown folder status '{other}'")),
        }
    }
}

impl std::fmt::Display for FolderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named collection of documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "documentType")]
    pub document_type: DocumentType,
    #[serde(default)]
    pub status: FolderStatus,
    #[serde(
        default,
        alias = "documentCount",
        alias = "documents_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub document_count: Option<u64>,
    #[serde(
        default,
        alias = "createdAt",
        deserialize_with = "de::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        alias = "updatedAt",
        deserialize_with = "de::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Sortable and searchable folder fields. The name is the API `order_by` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderField {
    Name,
    Description,
    DocumentType,
    Status,
    DocumentCount,
    CreatedAt,
    UpdatedAt,
}

impl ColumnKey for FolderField {
    fn name(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::DocumentType => "document_type",
            Self::Status => "status",
            Self::DocumentCount => "document_count",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "name" => Self::Name,
            "description" => Self::Description,
            "document_type" => Self::DocumentType,
            "status" => Self::Status,
            "document_count" => Self::DocumentCount,
            "created_at" => Self::CreatedAt,
            "updated_at" => Self::UpdatedAt,
            _ => return None,
        })
    }
}

impl TableRecord for Folder {
    type Id = FolderId;
    type Key = FolderField;

    fn id(&self) -> FolderId {
        self.id
    }

    fn value(&self, key: FolderField) -> Option<String> {
        match key {
            FolderField::Name => Some(self.name.clone()),
            FolderField::Description => self.description.clone(),
            FolderField::DocumentType => Some(self.document_type.to_string()),
            FolderField::Status => Some(self.status.to_string()),
            FolderField::DocumentCount => self.document_count.map(|n| n.to_string()),
            FolderField::CreatedAt => format_timestamp(self.created_at.as_ref()),
            FolderField::UpdatedAt => format_timestamp(self.updated_at.as_ref()),
        }
    }
}

/// Body of `POST /folders/`. Creates a folder when `id` is absent and
/// updates it otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FolderPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<FolderId>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub document_type: DocumentType,
    pub status: FolderStatus,
}

impl FolderPayload {
    /// A payload for a new folder.
    pub fn create(name: impl Into<String>, document_type: DocumentType) -> Self {
        Self {
            name: name.into(),
            document_type,
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn status(mut self, status: FolderStatus) -> Self {
        self.status = status;
        self
    }

    /// Checks the payload, trimming the name and dropping a blank description.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        let mut errors = Vec::new();

        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            errors.push(FieldValidationError::with_code(
                "name",
                "Folder name is required",
                "required",
            ));
        } else if self.name.chars().count() > MAX_FOLDER_NAME_LEN {
            errors.push(FieldValidationError::with_code(
                "name",
                format!("Folder name must be at most {MAX_FOLDER_NAME_LEN} characters"),
                "too_long",
            ));
        }
        self.description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        ValidationError::check(errors)?;
        Ok(self)
    }
}

impl From<&Folder> for FolderPayload {
    fn from(folder: &Folder) -> Self {
        Self {
            id: Some(folder.id),
            name: folder.name.clone(),
            description: folder.description.clone(),
            document_type: folder.document_type,
            status: folder.status,
        }
    }
}
