//! HTTP client for the harvester
//!
//! One client, and so one connection pool, is shared by every request of a
//! run. Every request carries the configured user agent and deadline.

use reqwest::Client as ReqwestClient;
use tracing::{debug, instrument, warn};

use crate::config::ScraperConfig;
use crate::crawler::error::CrawlError;

/// HTTP client shared across a harvest run
#[derive(Clone, Debug)]
pub struct HttpClient {
    /// The underlying reqwest client
    client: ReqwestClient,
}

impl HttpClient {
    /// Create a client using the timeout and user agent from the configuration
    pub fn new(config: &ScraperConfig) -> Result<Self, CrawlError> {
        let client = ReqwestClient::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }

    /// Fetch a page body as text
    ///
    /// The status code is not checked: error pages are parsed like any other
    /// page and simply yield no useful links.
    #[instrument(skip(self), level = "debug")]
    pub async fn get_text(&self, url: &str) -> Result<String, CrawlError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("GET {} returned {}", url, status);
        }
        let body = response.text().await?;
        debug!("Fetched {} bytes of HTML from {}", body.len(), url);
        Ok(body)
    }

    /// Fetch a payload, failing on any non-success status
    #[instrument(skip(self), level = "debug")]
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, CrawlError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        debug!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
