use crate::config::RetailerConfig;
use crate::model::{Listing, ScraperError};
use crate::parser::Parser;
use crate::scraper::synth::{retailer_search_url, synthesize};
use crate::scraper::{ListingSource, Scraper};
use std::sync::Arc;
use tracing::{info, warn};

/// Fetches and parses the retailer's real search page, falling back to a
/// synthesized listing whenever the fetch or the parse comes up empty.
pub struct LiveSource {
    pub retailer: RetailerConfig,
    pub scraper: Arc<dyn Scraper>,
    pub parser: Arc<dyn Parser>,
}

impl LiveSource {
    pub fn new(retailer: RetailerConfig, scraper: Arc<dyn Scraper>, parser: Arc<dyn Parser>) -> Self {
        Self {
            retailer,
            scraper,
            parser,
        }
    }

    async fn fetch_and_parse(&self, query: &str) -> Result<Vec<Listing>, ScraperError> {
        let target = retailer_search_url(&self.retailer, query);
        let html = self.scraper.fetch(&target).await?;
        let listings = self.parser.parse(&html, query, &self.retailer)?;
        Ok(listings)
    }
}

#[async_trait::async_trait]
impl ListingSource for LiveSource {
    fn name(&self) -> &str {
        &self.retailer.name
    }

    async fn search(&self, query: &str) -> Result<Vec<Listing>, ScraperError> {
        match self.fetch_and_parse(query).await {
            Ok(listings) => {
                info!("{}: parsed {} live listings", self.retailer.name, listings.len());
                Ok(listings)
            }
            Err(e) => {
                warn!("{} live fetch failed, using fallback data: {}", self.retailer.name, e);
                Ok(vec![synthesize(query, &self.retailer, &mut rand::rng())])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_retailers;
    use crate::parser::AmazonParser;

    struct CannedScraper(Result<&'static str, u16>);

    #[async_trait::async_trait]
    impl Scraper for CannedScraper {
        async fn fetch(&self, _url: &str) -> Result<String, ScraperError> {
            self.0
                .map(str::to_string)
                .map_err(ScraperError::InvalidResponse)
        }
    }

    fn source(scraper: CannedScraper) -> LiveSource {
        let amazon = default_retailers().into_iter().next().unwrap();
        LiveSource::new(amazon, Arc::new(scraper), Arc::new(AmazonParser::new()))
    }

    #[tokio::test]
    async fn uses_parsed_listings_when_available() {
        let html = r#"<span class="a-size-medium-plus a-color-base a-text-normal">Nike Air Max 90</span>
                      <span class="a-price-whole">8,495</span>"#;
        let listings = source(CannedScraper(Ok(html))).search("nike air max").await.unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].name, "Nike Air Max 90");
        assert_eq!(listings[0].price, "₹8,495");
    }

    #[tokio::test]
    async fn falls_back_to_synthesized_listing_on_error() {
        let listings = source(CannedScraper(Err(503))).search("nike air max").await.unwrap();
        assert_eq!(listings.len(), 1);
        // 8995 × 0.95
        assert_eq!(listings[0].price, "₹8,545.25");
    }

    #[tokio::test]
    async fn falls_back_when_page_has_no_results() {
        let listings = source(CannedScraper(Ok("<html></html>"))).search("kettle").await.unwrap();
        assert_eq!(listings[0].name, "kettle - Premium Quality");
    }
}
