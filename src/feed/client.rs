use crate::config::Config;
use crate::feed::catalog::{CategoryId, RequestDescriptor};
use crate::feed::envelope::FeedEnvelope;
use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://rss.itunes.apple.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur while fetching one chart resource.
///
/// Each error is terminal for that one fetch only; sibling fetches in the
/// same batch are unaffected.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No response at all (DNS, connection, TLS)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Response headers arrived but the body stream broke off
    #[error("Response body from {url} was interrupted: {source}")]
    InterruptedBody {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// Response not fully received within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// Response with a non-2xx status code
    #[error("Unsuccessful response from {url}: status {status}")]
    UnsuccessfulResponse { url: String, status: u16 },
    /// 2xx response whose body is not a chart feed
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    /// Response body exceeded the configured size limit
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    /// Base URL cannot be turned into a request URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// A result's `kind` does not belong to the category it was fetched for
    #[error("Result of kind '{kind}' does not belong to category {category}")]
    InvalidCategoryMapping { category: CategoryId, kind: String },
}

impl FetchError {
    /// Returns true if this error is transient and the request may be re-issued.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport(_)
            | FetchError::InterruptedBody { .. }
            | FetchError::Timeout(_) => true,
            FetchError::UnsuccessfulResponse { status, .. } => *status >= 500,
            FetchError::Decode { .. }
            | FetchError::ResponseTooLarge(_)
            | FetchError::InvalidEndpoint(_)
            | FetchError::InvalidCategoryMapping { .. } => false,
        }
    }
}

/// Fetches and decodes one chart resource.
///
/// The coordinator only depends on this trait, so tests can substitute
/// clients with scripted latency and failures.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    async fn fetch(&self, descriptor: &RequestDescriptor) -> Result<FeedEnvelope, FetchError>;
}

/// [`ResourceClient`] backed by `reqwest`.
///
/// Issues one GET per call against
/// `{base}/api/v1/{country}/{media_type}/{chart}/{genre}/{limit}/explicit.{format}`.
/// Holds no mutable state, so concurrent calls and retries never interfere.
#[derive(Debug, Clone)]
pub struct HttpResourceClient {
    client: reqwest::Client,
    base_url: Url,
    country: String,
    retries: u32,
    timeout: Duration,
    max_body_bytes: usize,
}

impl HttpResourceClient {
    /// Creates a client with no retries, a 30s timeout and a 10MB body limit.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidEndpoint`] if `base_url` is not an
    /// absolute http(s) URL.
    pub fn new(client: reqwest::Client, base_url: &str, country: &str) -> Result<Self, FetchError> {
        let base_url =
            Url::parse(base_url).map_err(|e| FetchError::InvalidEndpoint(e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidEndpoint(format!(
                "{base_url} is not an http(s) base URL"
            )));
        }

        Ok(Self {
            client,
            base_url,
            country: country.to_ascii_lowercase(),
            retries: 0,
            timeout: DEFAULT_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        })
    }

    /// Builds a client from the loaded configuration.
    pub fn from_config(client: reqwest::Client, config: &Config) -> Result<Self, FetchError> {
        Ok(Self::new(client, &config.base_url, &config.country)?
            .with_retries(config.retries)
            .with_timeout(Duration::from_secs(config.timeout_secs))
            .with_max_body_bytes(config.max_body_bytes))
    }

    /// Number of times a retryable failure re-issues the same request.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Resolves the request URL for a descriptor.
    pub fn endpoint(&self, descriptor: &RequestDescriptor) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                FetchError::InvalidEndpoint(format!("{} cannot be a base", self.base_url))
            })?;
            segments
                .pop_if_empty()
                .extend(["api", "v1", self.country.as_str()])
                .extend(descriptor.path_segments());
        }
        Ok(url)
    }

    /// One attempt. The timeout covers the headers and the whole body.
    async fn fetch_once(&self, url: &Url) -> Result<FeedEnvelope, FetchError> {
        tokio::time::timeout(self.timeout, self.request(url))
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))?
    }

    async fn request(&self, url: &Url) -> Result<FeedEnvelope, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnsuccessfulResponse {
                url: response.url().to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = read_limited_bytes(response, url, self.max_body_bytes).await?;
        serde_json::from_slice(&bytes).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    async fn fetch(&self, descriptor: &RequestDescriptor) -> Result<FeedEnvelope, FetchError> {
        let url = self.endpoint(descriptor)?;
        tracing::debug!(url = %url, "Fetching chart feed");

        let mut attempt = 0;
        loop {
            match self.fetch_once(&url).await {
                Ok(envelope) => return Ok(envelope),
                Err(e) if e.is_retryable() && attempt < self.retries => {
                    attempt += 1;
                    tracing::debug!(
                        url = %url,
                        error = %e,
                        retry = attempt,
                        max_retries = self.retries,
                        "Retrying chart fetch after transient error"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    url: &Url,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|source| FetchError::InterruptedBody {
            url: url.to_string(),
            source,
        })?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
