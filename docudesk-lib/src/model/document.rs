//! Document model and corrected-data validation

use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use super::DocumentId;
use super::DocumentType;
use super::FolderId;
use super::JobStatus;
use super::de;
use super::format_timestamp;
use crate::error::FieldValidationError;
use crate::error::ValidationError;
use crate::table::ColumnKey;
use crate::table::TableRecord;

/// Longest accepted document name.
pub const MAX_DOCUMENT_NAME_LEN: usize = 255;

/// Extracted fields that must hold a decimal amount.
pub const AMOUNT_FIELDS: &[&str] = &[
    "total",
    "total_amount",
    "subtotal",
    "tax",
    "tax_amount",
    "tax_rate",
    "discount",
    "amount",
    "unit_price",
    "quantity",
];

/// Keys of the nested line-item arrays.
const LINE_ITEM_FIELDS: &[&str] = &["items", "line_items"];

/// An uploaded invoice or receipt with its extracted data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    #[serde(alias = "filename", alias = "file_name")]
    pub name: String,
    #[serde(default, alias = "folderId", skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<FolderId>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default, alias = "fileUrl", skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, alias = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, alias = "documentType", skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
    #[serde(default, alias = "extractedData", skip_serializing_if = "Option::is_none")]
    pub extracted_data: Option<Value>,
    #[serde(default, alias = "correctedData", skip_serializing_if = "Option::is_none")]
    pub corrected_data: Option<Value>,
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

impl Document {
    /// The data to show: corrections when present, the extraction otherwise.
    pub fn data(&self) -> Option<&Value> {
        self.corrected_data
            .as_ref()
            .filter(|v| !v.is_null())
            .or(self.extracted_data.as_ref())
    }

    /// Returns `true` if someone corrected the extraction.
    pub fn is_corrected(&self) -> bool {
        self.corrected_data.as_ref().is_some_and(|v| !v.is_null())
    }

    /// Reads a top-level amount from [`Document::data`].
    pub fn amount(&self, field: &str) -> Option<Decimal> {
        self.data()?.get(field).and_then(amount_of)
    }
}

/// Sortable and searchable document fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentField {
    Name,
    Status,
    DocumentType,
    MimeType,
    CreatedAt,
    UpdatedAt,
}

impl ColumnKey for DocumentField {
    fn name(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Status => "status",
            Self::DocumentType => "document_type",
            Self::MimeType => "mime_type",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "name" => Self::Name,
            "status" => Self::Status,
            "document_type" => Self::DocumentType,
            "mime_type" => Self::MimeType,
            "created_at" => Self::CreatedAt,
            "updated_at" => Self::UpdatedAt,
            _ => return None,
        })
    }
}

impl TableRecord for Document {
    type Id = DocumentId;
    type Key = DocumentField;

    fn id(&self) -> DocumentId {
        self.id
    }

    fn value(&self, key: DocumentField) -> Option<String> {
        match key {
            DocumentField::Name => Some(self.name.clone()),
            DocumentField::Status => Some(self.status.to_string()),
            DocumentField::DocumentType => self.document_type.map(|t| t.to_string()),
            DocumentField::MimeType => self.mime_type.clone(),
            DocumentField::CreatedAt => format_timestamp(self.created_at.as_ref()),
            DocumentField::UpdatedAt => format_timestamp(self.updated_at.as_ref()),
        }
    }
}

/// Validates a new document name, returning it trimmed.
pub fn validate_document_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError {
            fields: vec![FieldValidationError::with_code(
                "name",
                "Document name is required",
                "required",
            )],
        });
    }
    if name.chars().count() > MAX_DOCUMENT_NAME_LEN {
        return Err(ValidationError {
            fields: vec![FieldValidationError::with_code(
                "name",
                format!("Document name must be at most {MAX_DOCUMENT_NAME_LEN} characters"),
                "too_long",
            )],
        });
    }
    if name.contains(['/', '\\']) {
        return Err(ValidationError {
            fields: vec![FieldValidationError::with_code(
                "name",
                "Document name cannot contain path separators",
                "invalid",
            )],
        });
    }
    Ok(name.to_string())
}

/// Checks corrected data before it is sent.
///
/// The data must be a JSON object. Every [`AMOUNT_FIELDS`] entry, at the
/// top level or inside a line-item array, must be null, a number, or a
/// string holding a decimal number.
pub fn validate_corrected_data(data: &Value) -> Result<(), ValidationError> {
    let Some(object) = data.as_object() else {
        return Err(ValidationError::single(
            "corrected_data",
            "Corrected data must be an object",
        ));
    };

    let mut errors = Vec::new();
    check_amounts(object, "", &mut errors);

    for key in LINE_ITEM_FIELDS {
        let Some(items) = object.get(*key).and_then(Value::as_array) else {
            continue;
        };
        for (i, item) in items.iter().enumerate() {
            if let Some(item) = item.as_object() {
                check_amounts(item, &format!("{key}[{i}]."), &mut errors);
            }
        }
    }

    ValidationError::check(errors)
}

fn check_amounts(
    object: &serde_json::Map<String, Value>,
    prefix: &str,
    errors: &mut Vec<FieldValidationError>,
) {
    for field in AMOUNT_FIELDS {
        match object.get(*field) {
            None | Some(Value::Null) | Some(Value::Number(_)) => {}
            Some(value) if amount_of(value).is_some() => {}
            Some(value) => errors.push(FieldValidationError::with_code(
                format!("{prefix}{field}"),
                format!("'{}' is not a valid number", display_value(value)),
                "invalid_number",
            )),
        }
    }
}

/// Parses a JSON amount. Strings may use a comma as decimal separator.
pub fn amount_of(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            let normalized = if s.contains(',') && !s.contains('.') {
                s.replace(',', ".")
            } else {
                s.to_string()
            };
            Decimal::from_str(&normalized).ok()
        }
        _ => None,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
