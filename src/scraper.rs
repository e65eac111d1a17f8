use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::ScraperConfig;
use crate::utils::error::{AppError, Result};

/// Retrieves the raw document behind a product URL.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Plain HTTP GET fetcher.
pub struct WebScraper {
    client: Client,
}

impl WebScraper {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentFetcher for WebScraper {
    async fn fetch(&self, url: &str) -> Result<String> {
        let start_time = std::time::Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::fetch(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Request for {} returned {}", url, status);
            return Err(AppError::fetch(url, format!("server returned {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::fetch(url, format!("failed to read body: {}", e)))?;

        tracing::debug!(
            "Fetched {} ({} bytes in {} ms)",
            url,
            body.len(),
            start_time.elapsed().as_millis()
        );
        Ok(body)
    }
}
