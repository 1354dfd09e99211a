//! Error types

mod api;
mod auth;
mod config;
mod presentation;
mod validation;

use std::time::Duration;

pub use api::*;
pub use auth::*;
pub use config::*;
pub use presentation::*;
pub use validation::*;

/// Top-level error returned by client, service and page operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote API failed or returned an error response.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No usable bearer token.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Runtime configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Client-side validation rejected the input; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Too many requests, retries exhausted.
    #[error("Rate limited{}", retry_after.map(|d| format!(", retry after {d:?}")).unwrap_or_default())]
    RateLimit {
        /// Server-suggested wait, from the `Retry-After` header.
        retry_after: Option<Duration>,
    },
}

impl Error {
    /// Returns the HTTP status code if the server answered with an error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(api) => api.status_code(),
            Self::RateLimit { .. } => Some(429),
            _ => None,
        }
    }

    /// Returns `true` if repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api(api) => api.is_retryable(),
            Self::RateLimit { .. } => true,
            _ => false,
        }
    }
}
