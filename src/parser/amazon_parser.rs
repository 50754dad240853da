// Amazon-specific HTML parsing
use crate::catalog;
use crate::config::RetailerConfig;
use crate::model::{Listing, ParserError};
use crate::scraper::synth::{random_rating, random_reviews, retailer_search_url};
use crate::utils::{format_rupees, parse_price};
use rand::Rng;
use scraper::{Html, Selector};

pub const MAX_PARSED_LISTINGS: usize = 3;

pub trait Parser: Send + Sync {
    fn parse(&self, html: &str, query: &str, retailer: &RetailerConfig) -> Result<Vec<Listing>, ParserError>;
}

pub struct AmazonParser;

impl AmazonParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_with<R: Rng>(
        &self,
        html: &str,
        query: &str,
        retailer: &RetailerConfig,
        rng: &mut R,
    ) -> Result<Vec<Listing>, ParserError> {
        let document = Html::parse_document(html);

        let title_selector = selector("span.a-size-medium-plus.a-color-base.a-text-normal")?;
        let price_selector = selector("span.a-price-whole")?;

        let titles = document
            .select(&title_selector)
            .map(|node| node.text().collect::<String>().trim().to_string());
        let prices = document
            .select(&price_selector)
            .map(|node| node.text().collect::<String>());

        let mut listings = Vec::new();
        for (title, price_text) in titles.zip(prices).take(MAX_PARSED_LISTINGS) {
            // Sponsored tiles sometimes carry an empty title or a price without digits.
            let Some(price) = parse_price(&price_text) else {
                continue;
            };
            if title.is_empty() {
                continue;
            }

            listings.push(Listing {
                features: catalog::features(&title),
                name: title,
                price: format_rupees(price),
                original_price: None,
                retailer: retailer.name.clone(),
                url: retailer_search_url(retailer, query),
                retailer_logo: retailer.logo.clone(),
                retailer_color: retailer.color.clone(),
                availability: "In Stock".to_string(),
                rating: random_rating(rng, 4.0, 1.0),
                reviews: random_reviews(rng, 1000, 10000),
                discount: None,
                delivery: None,
                image: Some(catalog::product_image(query)),
            });
        }

        if listings.is_empty() {
            return Err(ParserError::NoListings);
        }
        Ok(listings)
    }
}

impl Default for AmazonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for AmazonParser {
    fn parse(&self, html: &str, query: &str, retailer: &RetailerConfig) -> Result<Vec<Listing>, ParserError> {
        self.parse_with(html, query, retailer, &mut rand::rng())
    }
}

fn selector(css: &str) -> Result<Selector, ParserError> {
    Selector::parse(css).map_err(|e| ParserError::HtmlParseError(format!("{:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_retailers;

    const PAGE: &str = r#"
        <html><body>
          <div class="s-result-item">
            <span class="a-size-medium-plus a-color-base a-text-normal">Apple iPhone 15 (128 GB) - Black</span>
            <span class="a-price-whole">69,900</span>
          </div>
          <div class="s-result-item">
            <span class="a-size-medium-plus a-color-base a-text-normal"> Apple iPhone 15 Plus (128 GB) </span>
            <span class="a-price-whole">79,900.</span>
          </div>
          <div class="s-result-item">
            <span class="a-size-medium-plus a-color-base a-text-normal">Apple iPhone 14</span>
            <span class="a-price-whole">58,999</span>
          </div>
          <div class="s-result-item">
            <span class="a-size-medium-plus a-color-base a-text-normal">Apple iPhone 13</span>
            <span class="a-price-whole">49,999</span>
          </div>
        </body></html>
    "#;

    fn amazon() -> RetailerConfig {
        default_retailers().into_iter().next().unwrap()
    }

    #[test]
    fn parses_at_most_three_listings() {
        let listings = AmazonParser::new().parse(PAGE, "iphone 15", &amazon()).unwrap();
        assert_eq!(listings.len(), MAX_PARSED_LISTINGS);
        assert_eq!(listings[0].name, "Apple iPhone 15 (128 GB) - Black");
        assert_eq!(listings[0].price, "₹69,900");
        assert_eq!(listings[1].name, "Apple iPhone 15 Plus (128 GB)");
        assert_eq!(listings[1].price, "₹79,900");
        assert_eq!(listings[2].retailer, "Amazon India");
        assert!(listings.iter().all(|l| (4.0..=5.0).contains(&l.rating)));
    }

    #[test]
    fn page_without_results_is_an_error() {
        let err = AmazonParser::new()
            .parse("<html><body><p>Robot check</p></body></html>", "iphone", &amazon())
            .unwrap_err();
        assert!(matches!(err, ParserError::NoListings));
    }
}
