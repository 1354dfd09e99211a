//! Main ConsoleClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::TokenProvider;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::error::AuthError;
use crate::error::Error;
use crate::retry::RetryConfig;

/// HTTP client for the document console API.
///
/// Attaches the bearer token to every request and turns non-success
/// responses into [`ApiError`]s. Cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// use docudesk_lib::{ConsoleClient, auth::StaticTokenProvider};
///
/// let client = ConsoleClient::builder()
///     .base_url("https://console.example.com/api")
///     .token_provider(StaticTokenProvider::new("my-token"))
///     .build()?;
///
/// let folders = client.list_folders(&Default::default()).await?;
/// ```
#[derive(Clone)]
pub struct ConsoleClient {
    inner: Arc<ConsoleClientInner>,
}

struct ConsoleClientInner {
    base_url: Url,
    token_provider: Arc<dyn TokenProvider>,
    http_client: Client,
    timeout: Option<Duration>,
    retry_config: RetryConfig,
}

impl std::fmt::Debug for ConsoleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

impl ConsoleClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> ConsoleClientBuilder<Missing, Missing> {
        ConsoleClientBuilder::new()
    }

    /// Creates a client from the runtime configuration.
    pub fn from_config<T: TokenProvider + 'static>(
        config: &AppConfig,
        provider: T,
    ) -> Result<Self, Error> {
        Self::builder()
            .base_url(config.api_base_url.clone())
            .token_provider(provider)
            .build()
    }

    /// Returns the base URL of the API.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Builds an endpoint URL by appending path segments to the base URL.
    ///
    /// Segments are percent-encoded. An empty trailing segment produces a
    /// trailing slash (`["folders", ""]` → `/folders/`).
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Builds an endpoint URL with query parameters.
    pub(crate) fn endpoint_with_query<K, V>(
        &self,
        segments: &[&str],
        query: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Url, Error>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = self.endpoint(segments)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key.as_ref(), value.as_ref());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    /// Sends a request and decodes the JSON response body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let response = self.request(Method::GET, url, None).await?;
        decode_json(response).await
    }

    /// Sends a JSON body and decodes the JSON response body.
    pub(crate) async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::parse(e.to_string()))?;
        let response = self.request(method, url, Some(body)).await?;
        decode_json(response).await
    }

    /// Sends a request whose response body is irrelevant.
    pub(crate) async fn send_empty<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<(), Error> {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| ApiError::parse(e.to_string()))?;
        self.request(method, url, body).await?;
        Ok(())
    }

    /// Sends a request, retrying transient failures according to the
    /// client's [`RetryConfig`].
    ///
    /// Non-success responses are converted to [`ApiError::Http`].
    pub(crate) async fn request(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, Error> {
        let retry_config = &self.inner.retry_config;
        let repeatable = retry_config.may_repeat(&method);
        let mut attempts = 0;
        let mut delay = retry_config.initial_delay;

        loop {
            log::debug!("{} {}", method, url);
            let result = self.send_request_inner(method.clone(), url.clone(), body.as_ref()).await;

            match result {
                Ok(response) => {
                    let status = response.status();

                    if status.as_u16() == 429 {
                        if !retry_config.retry_on_429 || attempts >= retry_config.max_retries {
                            let retry_after = parse_retry_after(&response);
                            return Err(Error::RateLimit { retry_after });
                        }

                        let wait = parse_retry_after(&response).unwrap_or(delay);
                        log::debug!("rate limited on {url}, waiting {wait:?}");
                        tokio::time::sleep(wait).await;
                        attempts += 1;
                        continue;
                    }

                    if status.is_server_error()
                        && repeatable
                        && retry_config.retry_on_5xx
                        && attempts < retry_config.max_retries
                    {
                        log::debug!("{} from {url}, retrying in {delay:?}", status.as_u16());
                        tokio::time::sleep(delay).await;
                        delay = retry_config.next_delay(delay);
                        attempts += 1;
                        continue;
                    }

                    if status.is_success() {
                        return Ok(response);
                    }

                    let status_code = status.as_u16();
                    let body = response.text().await.unwrap_or_default();
                    log::debug!("{method} {url} failed with {status_code}");
                    return Err(Error::Api(ApiError::from_body(status_code, &body)));
                }
                Err(e) => {
                    let is_network = matches!(&e, Error::Api(ApiError::Network(_)));

                    if is_network
                        && repeatable
                        && retry_config.retry_on_network
                        && attempts < retry_config.max_retries
                    {
                        tokio::time::sleep(delay).await;
                        delay = retry_config.next_delay(delay);
                        attempts += 1;
                        continue;
                    }

                    return Err(e);
                }
            }
        }
    }

    /// Inner request method without retry logic.
    async fn send_request_inner(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, Error> {
        let token = self.inner.token_provider.get_token().await?;
        if token.is_expired() {
            return Err(Error::Auth(AuthError::TokenExpired {
                message: "stored token is past its expiry".to_string(),
            }));
        }

        let mut request = self
            .inner
            .http_client
            .request(method, url)
            .bearer_auth(&token.access_token);

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        request.send().await.map_err(|e| {
            match (e.is_timeout(), self.inner.timeout) {
                (true, Some(timeout)) => Error::Api(ApiError::Timeout(timeout)),
                _ => Error::Api(ApiError::from(e)),
            }
        })
    }
}

/// Decodes a JSON body, keeping the raw text on failure.
async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, Error> {
    let text = response.text().await.map_err(ApiError::from)?;
    serde_json::from_str(&text)
        .map_err(|e| Error::Api(ApiError::parse_with_body(e.to_string(), text)))
}

/// Parses the Retry-After header value (seconds).
fn parse_retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get("Retry-After")?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`ConsoleClient`].
///
/// Uses the typestate pattern so `base_url` and `token_provider` must be
/// set before `build` is available.
pub struct ConsoleClientBuilder<U, P> {
    base_url: U,
    token_provider: P,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
    retry_config: RetryConfig,
}

impl ConsoleClientBuilder<Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: Missing,
            token_provider: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
            retry_config: RetryConfig::default(),
        }
    }
}

impl Default for ConsoleClientBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> ConsoleClientBuilder<Missing, P> {
    /// Sets the API base URL, e.g. `https://console.example.com/api`.
    pub fn base_url(self, url: impl Into<String>) -> ConsoleClientBuilder<Set<String>, P> {
        ConsoleClientBuilder {
            base_url: Set(url.into()),
            token_provider: self.token_provider,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
            retry_config: self.retry_config,
        }
    }
}

impl<U> ConsoleClientBuilder<U, Missing> {
    /// Sets the token provider for authentication.
    pub fn token_provider<T: TokenProvider + 'static>(
        self,
        provider: T,
    ) -> ConsoleClientBuilder<U, Set<Arc<dyn TokenProvider>>> {
        ConsoleClientBuilder {
            base_url: self.base_url,
            token_provider: Set(Arc::new(provider) as Arc<dyn TokenProvider>),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
            retry_config: self.retry_config,
        }
    }
}

impl<U, P> ConsoleClientBuilder<U, P> {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout used when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the retry policy.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }
}

impl ConsoleClientBuilder<Set<String>, Set<Arc<dyn TokenProvider>>> {
    /// Builds the [`ConsoleClient`].
    ///
    /// Fails if the base URL cannot be parsed or cannot carry path segments.
    pub fn build(self) -> Result<ConsoleClient, Error> {
        let base_url =
            Url::parse(&self.base_url.0).map_err(|_| ApiError::InvalidUrl(self.base_url.0.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(self.base_url.0).into());
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(ApiError::from)?
            }
        };

        Ok(ConsoleClient {
            inner: Arc::new(ConsoleClientInner {
                base_url,
                token_provider: self.token_provider.0,
                http_client,
                timeout: self.timeout,
                retry_config: self.retry_config,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;

    fn client(base: &str) -> ConsoleClient {
        ConsoleClient::builder()
            .base_url(base)
            .token_provider(StaticTokenProvider::new("t"))
            .build()
            .unwrap()
    }

    #[test]
    fn endpoint_appends_segments() {
        let c = client("https://api.example.com/api/");
        let url = c.endpoint(&["folders", "12", "documents"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/folders/12/documents");
    }

    #[test]
    fn endpoint_keeps_trailing_slash_for_empty_segment() {
        let c = client("https://api.example.com/api");
        let url = c.endpoint(&["folders", ""]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/folders/");
    }

    #[test]
    fn endpoint_encodes_segments() {
        let c = client("https://api.example.com");
        let url = c.endpoint(&["call-logs", "by-clinic", "north side"]).unwrap();
        assert_eq!(url.path(), "/call-logs/by-clinic/north%20side");
    }

    #[test]
    fn empty_query_is_dropped() {
        let c = client("https://api.example.com");
        let url = c
            .endpoint_with_query(&["folders"], Vec::<(&str, &str)>::new())
            .unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/folders");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = ConsoleClient::builder()
            .base_url("not a url")
            .token_provider(StaticTokenProvider::new("t"))
            .build();
        assert!(matches!(result, Err(Error::Api(ApiError::InvalidUrl(_)))));
    }
}
