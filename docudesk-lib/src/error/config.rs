//! Configuration error types

/// Errors that can occur while loading the runtime configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration could not be fetched over HTTP.
    #[error("Failed to fetch config from {url}: {message}")]
    Fetch { url: String, message: String },

    /// The configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid JSON for the expected shape.
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
