//! HTTP client for the TrueSignals order feed
//!
//! The feed is a static JSON file published on GitHub Pages. This client only
//! fetches and decodes it; layout handling lives in [`crate::data::normalize`].

use std::time::Duration;

use reqwest::header::{ACCEPT, CACHE_CONTROL, PRAGMA};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Default feed location
pub const DEFAULT_FEED_URL: &str = "https://cagatay-a.github.io/TrueSignals/api-data.json";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when fetching the feed
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request or body decoding failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP error! status: {0}")]
    Status(StatusCode),
}

/// Client for the order feed
#[derive(Debug, Clone)]
pub struct FeedClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Feed URL
    url: String,
}

impl FeedClient {
    /// Creates a client for `url` with the given request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            url: url.into(),
        })
    }

    /// The feed URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches the feed and decodes it as JSON of any shape.
    ///
    /// Caching proxies are asked to revalidate so every poll sees the latest file.
    pub async fn fetch(&self) -> Result<Value, FeedError> {
        debug!(url = %self.url, "Fetching order feed");

        let response = self
            .http_client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        Ok(response.json::<Value>().await?)
    }
}
