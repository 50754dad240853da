// Listing synthesis from the static catalog and the retailer table
use crate::catalog;
use crate::config::RetailerConfig;
use crate::model::{Listing, ScraperError};
use crate::scraper::ListingSource;
use crate::utils::{format_inr, search_url};
use rand::Rng;

/// Fabricates the single listing a retailer shows for a query.
pub fn synthesize<R: Rng>(query: &str, retailer: &RetailerConfig, rng: &mut R) -> Listing {
    let base = catalog::base_price(query) as f64;

    Listing {
        name: catalog::product_name(query, rng),
        price: format_inr(base * retailer.price_factor),
        original_price: Some(format_inr(base * retailer.original_price_factor)),
        retailer: retailer.name.clone(),
        url: retailer_search_url(retailer, query),
        retailer_logo: retailer.logo.clone(),
        retailer_color: retailer.color.clone(),
        features: catalog::features(query),
        availability: retailer.availability.clone(),
        rating: random_rating(rng, retailer.rating_base, retailer.rating_spread),
        reviews: random_reviews(rng, retailer.reviews_base, retailer.reviews_spread),
        discount: non_empty(&retailer.discount),
        delivery: non_empty(&retailer.delivery),
        image: Some(catalog::product_image(query)),
    }
}

pub fn retailer_search_url(retailer: &RetailerConfig, query: &str) -> String {
    search_url(&retailer.search_url, &retailer.query_param, query)
        .unwrap_or_else(|| retailer.search_url.clone())
}

/// `base + uniform(0, spread)`, one decimal.
pub fn random_rating<R: Rng>(rng: &mut R, base: f64, spread: f64) -> f64 {
    let raw = base + rng.random::<f64>() * spread.max(0.0);
    (raw * 10.0).round() / 10.0
}

pub fn random_reviews<R: Rng>(rng: &mut R, base: u32, spread: u32) -> u32 {
    if spread == 0 {
        return base;
    }
    base + rng.random_range(0..spread)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Listing source backed purely by the static tables. Never fails.
pub struct SynthesizedSource {
    pub retailer: RetailerConfig,
}

impl SynthesizedSource {
    pub fn new(retailer: RetailerConfig) -> Self {
        Self { retailer }
    }
}

#[async_trait::async_trait]
impl ListingSource for SynthesizedSource {
    fn name(&self) -> &str {
        &self.retailer.name
    }

    async fn search(&self, query: &str) -> Result<Vec<Listing>, ScraperError> {
        Ok(vec![synthesize(query, &self.retailer, &mut rand::rng())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_retailers;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn retailer(key: &str) -> RetailerConfig {
        default_retailers()
            .into_iter()
            .find(|r| r.key == key)
            .unwrap()
    }

    #[test]
    fn amazon_listing_uses_its_price_factor() {
        let mut rng = StdRng::seed_from_u64(1);
        let listing = synthesize("iPhone 15 Pro Max", &retailer("amazon"), &mut rng);
        assert_eq!(listing.price, "₹1,51,905");
        assert_eq!(listing.original_price.as_deref(), Some("₹1,75,890"));
        assert_eq!(listing.retailer, "Amazon India");
        assert_eq!(listing.url, "https://www.amazon.in/s?k=iPhone+15+Pro+Max");
        assert_eq!(listing.delivery.as_deref(), Some("FREE Delivery by Tomorrow"));
        assert!(listing.name.starts_with("Apple iPhone"));
    }

    #[test]
    fn rating_and_reviews_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let croma = retailer("croma");
        for _ in 0..50 {
            let listing = synthesize("kettle", &croma, &mut rng);
            assert!((4.0..=4.8).contains(&listing.rating));
            assert!((800..3800).contains(&listing.reviews));
        }
    }

    #[test]
    fn zero_spread_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(random_reviews(&mut rng, 500, 0), 500);
        assert_eq!(random_rating(&mut rng, 4.5, 0.0), 4.5);
    }

    #[tokio::test]
    async fn synthesized_source_returns_one_listing() {
        let source = SynthesizedSource::new(retailer("reliance"));
        let listings = source.search("samsung galaxy s24").await.unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].price, "₹77,248.97");
        assert_eq!(source.name(), "Reliance Digital");
    }
}
