//! Retry policy for transient request failures.

use std::time::Duration;

use reqwest::Method;

/// Configuration for automatic retry behavior.
///
/// Controls how the client handles rate limiting (429), server errors (5xx)
/// and network errors. Server errors and network errors are only retried
/// for idempotent methods, so a failed `POST /documents/process` is never
/// submitted twice.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use docudesk_lib::retry::RetryConfig;
///
/// let custom = RetryConfig::default()
///     .max_retries(5)
///     .initial_delay(Duration::from_millis(500));
///
/// let none = RetryConfig::no_retry();
/// assert_eq!(none.max_retries, 0);
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Initial delay between retries (doubles each attempt).
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Whether to retry on HTTP 429 (rate limited).
    pub retry_on_429: bool,
    /// Whether to retry idempotent requests on HTTP 5xx.
    pub retry_on_5xx: bool,
    /// Whether to retry idempotent requests on network errors.
    pub retry_on_network: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            retry_on_429: true,
            retry_on_5xx: true,
            retry_on_network: true,
        }
    }
}

impl RetryConfig {
    /// Creates a config with all retries disabled.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            retry_on_429: false,
            retry_on_5xx: false,
            retry_on_network: false,
            ..Default::default()
        }
    }

    /// Sets the maximum number of retries.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Sets the initial delay between retries.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay between retries.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Returns the delay to use after `delay`, doubled and capped.
    pub(crate) fn next_delay(&self, delay: Duration) -> Duration {
        (delay * 2).min(self.max_delay)
    }

    /// Returns `true` if a 5xx or network failure of `method` may be retried.
    pub(crate) fn may_repeat(&self, method: &Method) -> bool {
        matches!(*method, Method::GET | Method::HEAD | Method::PUT | Method::DELETE)
    }
}
