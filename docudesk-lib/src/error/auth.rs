//! Authentication error types

/// Errors that can occur while obtaining a bearer token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No token has been stored; the user must sign in first.
    #[error("Not signed in")]
    MissingToken,

    /// The stored token has expired.
    #[error("Token expired: {message}")]
    TokenExpired { message: String },

    /// The token store could not be read.
    #[error("Token storage error: {0}")]
    Storage(String),
}
