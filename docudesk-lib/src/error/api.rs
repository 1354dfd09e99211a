//! API error types

use std::time::Duration;

use serde::Deserialize;

/// Errors that can occur during API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP error response from the API.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message, or the raw body if it was not structured.
        message: String,
        /// Translation key from a structured `{ "error_key": ... }` body.
        error_key: Option<String>,
    },

    /// Network error during API call (no response received).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse API response.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },
}

/// Structured error body returned by the backend on 4xx responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error_key: Option<String>,
    #[serde(alias = "error", alias = "detail")]
    message: Option<String>,
}

impl ApiError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            error_key: None,
        }
    }

    /// Builds an HTTP error from a response body.
    ///
    /// A JSON body carrying `error_key` (and optionally `message`, `error` or
    /// `detail`) is unpacked; anything else is kept verbatim as the message.
    pub fn from_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) if parsed.error_key.is_some() || parsed.message.is_some() => Self::Http {
                status,
                message: parsed
                    .message
                    .or_else(|| parsed.error_key.clone())
                    .unwrap_or_default(),
                error_key: parsed.error_key,
            },
            _ => Self::http(status, body),
        }
    }

    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the backend error key if available.
    pub fn error_key(&self) -> Option<&str> {
        match self {
            Self::Http { error_key, .. } => error_key.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` if no response was received at all.
    pub fn is_connection_failure(&self) -> bool {
        match self {
            Self::Network(e) => !e.is_decode() && !e.is_status(),
            Self::Timeout(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Network(_) => true,
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}
