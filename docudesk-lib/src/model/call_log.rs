//! Call log model

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::CallLogId;
use super::de;
use super::format_timestamp;
use crate::table::ColumnKey;
use crate::table::TableRecord;

/// Follow-up state of a call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CallStatus {
    #[default]
    New,
    InProgress,
    Resolved,
    Other(String),
}

impl CallStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for CallStatus {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().replace('-', "_").as_str() {
            "new" => Self::New,
            "in_progress" => Self::InProgress,
            "resolved" => Self::Resolved,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for CallStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<CallStatus> for String {
    fn from(status: CallStatus) -> Self {
        match status {
            CallStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transcribed phone call received by a clinic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallLog {
    pub id: CallLogId,
    #[serde(alias = "clinicId", deserialize_with = "de::string_or_number")]
    pub clinic_id: String,
    #[serde(default, alias = "callerName", skip_serializing_if = "Option::is_none")]
    pub caller_name: Option<String>,
    #[serde(default, alias = "callerPhone", skip_serializing_if = "Option::is_none")]
    pub caller_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub status: CallStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(default, alias = "audioUrl", skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, alias = "durationSeconds", skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    #[serde(
        default,
        alias = "createdAt",
        deserialize_with = "de::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl CallLog {
    /// Call length as `m:ss`.
    pub fn duration_label(&self) -> Option<String> {
        self.duration_seconds
            .map(|s| format!("{}:{:02}", s / 60, s % 60))
    }

    pub fn has_audio(&self) -> bool {
        self.audio_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallLogField {
    CallerName,
    CallerPhone,
    Reason,
    Status,
    Duration,
    CreatedAt,
}

impl ColumnKey for CallLogField {
    fn name(&self) -> &'static str {
        match self {
            Self::CallerName => "caller_name",
            Self::CallerPhone => "caller_phone",
            Self::Reason => "reason",
            Self::Status => "status",
            Self::Duration => "duration_seconds",
            Self::CreatedAt => "created_at",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "caller_name" => Self::CallerName,
            "caller_phone" => Self::CallerPhone,
            "reason" => Self::Reason,
            "status" => Self::Status,
            "duration_seconds" => Self::Duration,
            "created_at" => Self::CreatedAt,
            _ => return None,
        })
    }
}

impl TableRecord for CallLog {
    type Id = CallLogId;
    type Key = CallLogField;

    fn id(&self) -> CallLogId {
        self.id
    }

    fn value(&self, key: CallLogField) -> Option<String> {
        match key {
            CallLogField::CallerName => self.caller_name.clone(),
            CallLogField::CallerPhone => self.caller_phone.clone(),
            CallLogField::Reason => self.reason.clone(),
            CallLogField::Status => Some(self.status.to_string()),
            CallLogField::Duration => self.duration_label(),
            CallLogField::CreatedAt => format_timestamp(self.created_at.as_ref()),
        }
    }
}

/// Body of `PATCH /call-logs/:id`. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CallLogUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CallStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl CallLogUpdate {
    pub fn status(mut self, status: CallStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
