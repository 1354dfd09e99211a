//! Typed models for the console resources

mod call_log;
mod document;
mod folder;
mod note;
mod status;

pub use call_log::*;
pub use document::*;
pub use folder::*;
pub use note::*;
pub use status::*;

/// Identifier of a folder.
pub type FolderId = i64;
/// Identifier of a document.
pub type DocumentId = i64;
/// Identifier of a call log.
pub type CallLogId = i64;
/// Identifier of an internal note.
pub type NoteId = i64;

/// Lenient field decoders shared by the models.
pub(crate) mod de {
    use chrono::DateTime;
    use chrono::NaiveDateTime;
    use chrono::Utc;
    use serde::Deserialize;
    use serde::Deserializer;

    /// Accepts RFC 3339 timestamps and offset-less ones (read as UTC).
    pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(Some(dt.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f"))
            .map(|naive| Some(naive.and_utc()))
            .map_err(serde::de::Error::custom)
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Int(i64),
        Float(f64),
    }

    /// Accepts either a JSON string or a JSON number.
    pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match StringOrNumber::deserialize(deserializer)? {
            StringOrNumber::String(s) => s,
            StringOrNumber::Int(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        })
    }
}

/// Formats an optional timestamp for a table cell.
pub fn format_timestamp(value: Option<&chrono::DateTime<chrono::Utc>>) -> Option<String> {
    value.map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
}
