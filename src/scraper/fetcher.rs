use crate::model::ScraperError;
use crate::scraper::Scraper;
use crate::utils::search_url;

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Fetches retailer pages through a CORS-style raw proxy (`<proxy>?url=<target>`).
pub struct ScraperImpl {
    pub client: Client,
    pub proxy_url: String,
}

impl ScraperImpl {
    pub fn new(proxy_url: impl Into<String>, timeout: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) CardSaver/0.1")
            .timeout(timeout)
            .build()
            .map_err(|e| ScraperError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            proxy_url: proxy_url.into(),
        })
    }

    fn build_url(&self, target: &str) -> String {
        search_url(&self.proxy_url, "url", target).unwrap_or_else(|| target.to_string())
    }
}

#[async_trait::async_trait]
impl Scraper for ScraperImpl {
    async fn fetch(&self, target: &str) -> Result<String, ScraperError> {
        let url = self.build_url(target);
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ScraperError::HttpError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Proxy responded [{}] for {}", status, target);
            return Err(ScraperError::InvalidResponse(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| ScraperError::HttpError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_target_in_proxy_url() {
        let scraper = ScraperImpl::new("https://proxy.test/raw", Duration::from_secs(1)).unwrap();
        assert_eq!(
            scraper.build_url("https://www.amazon.in/s?k=iphone+15"),
            "https://proxy.test/raw?url=https%3A%2F%2Fwww.amazon.in%2Fs%3Fk%3Diphone%2B15"
        );
    }

    #[tokio::test]
    async fn unreachable_proxy_is_an_http_error() {
        let scraper = ScraperImpl::new("http://127.0.0.1:9/raw", Duration::from_secs(2)).unwrap();
        let err = scraper.fetch("https://www.amazon.in/s?k=x").await.unwrap_err();
        assert!(matches!(err, ScraperError::HttpError(_)));
    }
}
