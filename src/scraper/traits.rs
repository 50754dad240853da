use crate::model::{Listing, ScraperError};

/// Fetches a raw page body for a URL.
#[async_trait::async_trait]
pub trait Scraper: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ScraperError>;
}

/// Produces listings for one retailer.
#[async_trait::async_trait]
pub trait ListingSource: Send + Sync {
    fn name(&self) -> &str;
    async fn search(&self, query: &str) -> Result<Vec<Listing>, ScraperError>;
}
