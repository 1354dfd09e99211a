//! Processing status of a document job

use serde::Deserialize;
use serde::Serialize;

/// Status reported for a document by the processing pipeline.
///
/// Unknown values are kept verbatim in [`JobStatus::Other`] so that a new
/// backend status never breaks deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    #[default]
    Pending,
    Processing,
    Processed,
    Completed,
    Failed,
    Done,
    Archived,
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Processed => "processed",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Done => "done",
            Self::Archived => "archived",
            Self::Other(s) => s,
        }
    }

    /// Returns `true` once no further transition is expected.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Processed | Self::Completed | Self::Failed | Self::Done | Self::Archived
        )
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "processing" | "in_progress" => Self::Processing,
            "processed" => Self::Processed,
            "completed" => Self::Completed,
            "failed" | "error" => Self::Failed,
            "done" => Self::Done,
            "archived" => Self::Archived,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for JobStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
