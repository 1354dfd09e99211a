//! Internal notes attached to call logs

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::CallLogId;
use super::NoteId;
use super::de;
use crate::error::ValidationError;

/// Longest accepted note.
pub const MAX_NOTE_LEN: usize = 5000;

/// A staff note on a call log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalNote {
    pub id: NoteId,
    #[serde(alias = "callLogId")]
    pub call_log_id: CallLogId,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
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

/// Body of `POST /internal-notes/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNote {
    pub call_log_id: CallLogId,
    pub content: String,
}

/// Checks note content, returning it trimmed.
pub fn validate_note_content(content: &str) -> Result<String, ValidationError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ValidationError::single("content", "Note cannot be empty"));
    }
    if content.chars().count() > MAX_NOTE_LEN {
        return Err(ValidationError::single(
            "content",
            format!("Note must be at most {MAX_NOTE_LEN} characters"),
        ));
    }
    Ok(content.to_string())
}
