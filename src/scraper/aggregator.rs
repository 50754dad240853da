use crate::config::AppConfig;
use crate::model::{Listing, ScraperError};
use crate::parser::AmazonParser;
use crate::scraper::fetcher::ScraperImpl;
use crate::scraper::ListingSource;
use crate::scraper::live::LiveSource;
use crate::scraper::synth::SynthesizedSource;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Queries every retailer source at once and flattens whatever came back.
pub struct ListingAggregator {
    sources: Vec<Box<dyn ListingSource>>,
}

impl ListingAggregator {
    pub fn new(sources: Vec<Box<dyn ListingSource>>) -> Self {
        Self { sources }
    }

    /// One source per configured retailer. Retailers flagged `live` get the
    /// fetch-and-parse source when live fetching is switched on.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        let scraper = Arc::new(ScraperImpl::new(
            config.proxy_url.clone(),
            Duration::from_secs(config.request_timeout_seconds),
        )?);
        let parser = Arc::new(AmazonParser::new());

        let sources = config
            .retailers
            .iter()
            .map(|retailer| -> Box<dyn ListingSource> {
                if config.live_fetch && retailer.live {
                    info!("{}: live fetch enabled", retailer.key);
                    Box::new(LiveSource::new(retailer.clone(), scraper.clone(), parser.clone()))
                } else {
                    Box::new(SynthesizedSource::new(retailer.clone()))
                }
            })
            .collect();

        Ok(Self::new(sources))
    }

    /// Waits for every source to settle. Failed sources are logged and dropped,
    /// so the result may simply be shorter. Source order is preserved.
    pub async fn search(&self, query: &str) -> Vec<Listing> {
        let tasks = self.sources.iter().map(|source| source.search(query));
        let results = join_all(tasks).await;

        let mut listings = Vec::new();
        for (source, result) in self.sources.iter().zip(results) {
            match result {
                Ok(found) => listings.extend(found),
                Err(e) => warn!("Retailer {} failed: {}", source.name(), e),
            }
        }
        info!("Collected {} listings for '{}'", listings.len(), query);
        listings
    }
}
