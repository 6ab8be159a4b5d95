use chrono::{DateTime, Utc};
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::thumbnail::DEFAULT_PLACEHOLDER;
use super::types::{EnrichedItem, FeedResponse};
use crate::config::Config;

/// Length of one cache bucket: the proxy sees a new `_t` at most twice a day.
pub const CACHE_WINDOW_MS: i64 = 12 * 60 * 60 * 1000;

const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while loading the feed through the proxy.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Proxy or feed URL could not be assembled into a request URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Request exceeded the configured timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Body was not the expected JSON shape
    #[error("Malformed feed response: {0}")]
    Decode(#[from] serde_json::Error),
    /// Proxy answered but reported an error of its own
    #[error("Proxy reported an error: {0}")]
    Upstream(String),
}

/// Result of one load attempt, keeping "nothing in the feed" apart from
/// "could not get the feed".
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Vec<EnrichedItem>),
    Empty,
    Failed(LoadError),
}

impl LoadOutcome {
    /// Collapses the outcome to the uniform contract: failures become an
    /// empty list.
    pub fn into_items(self) -> Vec<EnrichedItem> {
        match self {
            LoadOutcome::Loaded(items) => items,
            LoadOutcome::Empty | LoadOutcome::Failed(_) => Vec::new(),
        }
    }
}

/// Cache-bucket number for a wall-clock time in epoch milliseconds.
///
/// Floor division, so times before the epoch land in negative buckets
/// rather than sharing bucket 0.
pub fn cache_bucket(now_ms: i64) -> i64 {
    now_ms.div_euclid(CACHE_WINDOW_MS)
}

/// Builds `{proxy}?rss_url={encoded feed}&_t={bucket}`.
pub fn request_url(proxy_url: &str, feed_url: &str, bucket: i64) -> Result<Url, LoadError> {
    let url = Url::parse_with_params(
        proxy_url,
        &[("rss_url", feed_url), ("_t", bucket.to_string().as_str())],
    )?;
    Ok(url)
}

/// Creates the HTTP client used for proxy requests.
pub fn build_client() -> Result<reqwest::Client, LoadError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("pinfeed/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Fetches the feed through the proxy and enriches every item.
#[derive(Clone)]
pub struct FeedLoader {
    client: reqwest::Client,
    proxy_url: String,
    feed_url: String,
    placeholder: String,
    timeout: Duration,
}

impl FeedLoader {
    pub fn new(client: reqwest::Client, proxy_url: &str, feed_url: &str) -> Self {
        Self {
            client,
            proxy_url: proxy_url.to_string(),
            feed_url: feed_url.to_string(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(client, &config.proxy_url, &config.feed_url)
            .with_placeholder(&config.placeholder_url)
            .with_timeout(Duration::from_secs(config.request_timeout_secs))
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    /// A zero duration disables the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Loads using the current wall clock for the cache bucket.
    pub async fn fetch(&self) -> Result<Vec<EnrichedItem>, LoadError> {
        self.fetch_at(Utc::now()).await
    }

    /// Loads as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// - [`LoadError::Network`] / [`LoadError::Timeout`] - request never completed
    /// - [`LoadError::HttpStatus`] - proxy answered with a non-2xx status
    /// - [`LoadError::ResponseTooLarge`] - body exceeded 10MB
    /// - [`LoadError::Decode`] - body was not the expected JSON
    /// - [`LoadError::Upstream`] - proxy returned `status: "error"`
    pub async fn fetch_at(&self, now: DateTime<Utc>) -> Result<Vec<EnrichedItem>, LoadError> {
        let bucket = cache_bucket(now.timestamp_millis());
        let url = request_url(&self.proxy_url, &self.feed_url, bucket)?;
        tracing::debug!(url = %url, bucket = bucket, "Requesting feed through proxy");

        let request = self.client.get(url).send();
        let response = if self.timeout.is_zero() {
            request.await?
        } else {
            tokio::time::timeout(self.timeout, request)
                .await
                .map_err(|_| LoadError::Timeout(self.timeout.as_secs()))??
        };

        if !response.status().is_success() {
            return Err(LoadError::HttpStatus(response.status().as_u16()));
        }

        let bytes = read_limited_bytes(response, MAX_RESPONSE_SIZE).await?;
        let body: FeedResponse = serde_json::from_slice(&bytes)?;

        if let Some(message) = body.upstream_error() {
            return Err(LoadError::Upstream(message.to_string()));
        }

        let items: Vec<EnrichedItem> = body
            .items
            .into_iter()
            .map(|item| EnrichedItem::from_feed_item(item, &self.placeholder))
            .collect();

        tracing::info!(items = items.len(), bucket = bucket, "Feed loaded");
        Ok(items)
    }

    /// Loads and reports the three possible outcomes. Failures are logged.
    pub async fn load(&self) -> LoadOutcome {
        match self.fetch().await {
            Ok(items) if items.is_empty() => LoadOutcome::Empty,
            Ok(items) => LoadOutcome::Loaded(items),
            Err(e) => {
                tracing::error!(feed = %self.feed_url, error = %e, "Error fetching pins");
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Loads the feed, returning an empty list on any failure.
    ///
    /// Callers cannot tell a failed load from a feed with zero items; use
    /// [`FeedLoader::load`] when that matters.
    pub async fn load_items(&self) -> Vec<EnrichedItem> {
        self.load().await.into_items()
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, LoadError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(LoadError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(LoadError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
