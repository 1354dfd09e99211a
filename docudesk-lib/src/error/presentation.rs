//! Mapping of errors onto what the user sees.

use super::ApiError;
use super::AuthError;
use super::Error;
use super::FieldValidationError;

/// Translation key used when the backend gives no `error_key`.
pub const GENERIC_ERROR_KEY: &str = "errors.generic";

/// Translation key used when the session is missing or expired.
pub const SESSION_ERROR_KEY: &str = "errors.session_expired";

/// Translation key used when requests are being throttled.
pub const RATE_LIMIT_ERROR_KEY: &str = "errors.rate_limited";

/// Which full-page error screen to route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPage {
    /// No response at all; "check your connection".
    Connection,
    /// The server failed; "try again later".
    ServerError,
}

/// How an error should be surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    /// Route to the generic error page.
    ErrorPage(ErrorPage),
    /// Show a transient notification carrying a translation key.
    Toast(String),
    /// Show messages next to the offending fields.
    Inline(Vec<FieldValidationError>),
}

impl Error {
    /// Classifies this error into the user-facing taxonomy.
    pub fn presentation(&self) -> Presentation {
        match self {
            Error::Api(ApiError::Http { status, .. }) if *status >= 500 => {
                Presentation::ErrorPage(ErrorPage::ServerError)
            }
            Error::Api(ApiError::Http { error_key, .. }) => Presentation::Toast(
                error_key.clone().unwrap_or_else(|| GENERIC_ERROR_KEY.to_string()),
            ),
            Error::Api(api) if api.is_connection_failure() => {
                Presentation::ErrorPage(ErrorPage::Connection)
            }
            Error::Api(_) | Error::Config(_) => Presentation::Toast(GENERIC_ERROR_KEY.to_string()),
            Error::Auth(AuthError::MissingToken | AuthError::TokenExpired { .. }) => {
                Presentation::Toast(SESSION_ERROR_KEY.to_string())
            }
            Error::Auth(AuthError::Storage(_)) => Presentation::Toast(GENERIC_ERROR_KEY.to_string()),
            Error::Validation(v) => Presentation::Inline(v.fields.clone()),
            Error::RateLimit { .. } => Presentation::Toast(RATE_LIMIT_ERROR_KEY.to_string()),
        }
    }
}
