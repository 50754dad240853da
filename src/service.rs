//! Search orchestration: listings, card analysis and the fallbacks between them.

use crate::analyzer::extract::{
    RemoteCardAdvice, RemoteSearch, decode, validate_card_advice, validate_products,
    validate_recommendations,
};
use crate::analyzer::{Analyzer, CardRules};
use crate::catalog;
use crate::config::AppConfig;
use crate::model::{
    AnalysisSource, BestDeal, CardAdvice, CardRecommendation, Listing, ProviderError, ScraperError,
    SearchError, SearchResult,
};
use crate::provider::{GenerationOptions, ProviderChain};
use crate::scraper::ListingAggregator;
use chrono::Utc;
use tracing::{info, warn};

/// Inputs shorter than this never produce suggestions.
pub const MIN_SUGGESTION_INPUT: usize = 2;

const PLACEHOLDER_CARD: &str = "SBI SimplyCLICK or HDFC Millennia";
const CALCULATING: &str = "Calculating...";

pub struct SearchService {
    aggregator: ListingAggregator,
    analyzer: Analyzer,
}

impl SearchService {
    pub fn new(aggregator: ListingAggregator, analyzer: Analyzer) -> Self {
        Self {
            aggregator,
            analyzer,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceInitError> {
        let aggregator = ListingAggregator::from_config(config)?;
        let chain = ProviderChain::from_config(config)?;
        let analyzer = Analyzer::new(CardRules::from_config(config), chain);
        Ok(Self::new(aggregator, analyzer))
    }

    /// Listings from every retailer plus a card per listing and the best deal.
    /// Only when no retailer produced anything does the search lean on the
    /// providers alone, and only then can it fail.
    pub async fn search(&self, query: &str) -> Result<SearchResult, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        info!("Searching for '{}'", query);
        let listings = self.aggregator.search(query).await;
        if listings.is_empty() {
            warn!("No retailer listings for '{}', falling back to AI-only search", query);
            return self.ai_only_search(query).await;
        }

        let analysis = self.analyzer.analyze(query, &listings).await;
        Ok(SearchResult {
            query: query.to_string(),
            products: listings,
            credit_card_recommendations: analysis.recommendations,
            best_deal: analysis.best_deal,
            analysis_source: analysis.source,
            real_data_fetched: true,
            timestamp: Utc::now(),
            raw_response: None,
        })
    }

    /// Asks the providers for products as well as cards.
    pub async fn ai_only_search(&self, query: &str) -> Result<SearchResult, SearchError> {
        let prompt = crate::analyzer::prompt::search_prompt(query);
        let text = match self
            .analyzer
            .chain()
            .generate(&prompt, GenerationOptions::SEARCH)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("AI-only search failed: {}", e);
                return Err(SearchError::AllProvidersUnavailable);
            }
        };

        let remote = decode::<RemoteSearch>(&text).and_then(|search| {
            validate_products(&search)?;
            Ok(search)
        });
        let remote = match remote {
            Ok(remote) => remote,
            Err(e) => {
                warn!("Rejected AI search response, returning placeholder: {}", e);
                return Ok(placeholder_result(query, text));
            }
        };

        let listings: Vec<Listing> = remote
            .products
            .iter()
            .map(|p| remote_listing(query, p.name.clone(), &p.price, &p.retailer, p.url.clone(), &p.features))
            .collect();

        let analysis = match validate_recommendations(&remote.credit_card_recommendations, &listings) {
            Ok(choices) => self.analyzer.priced(&listings, &choices, AnalysisSource::Remote),
            Err(e) => {
                warn!("AI search recommendations rejected, using local card rules: {}", e);
                self.analyzer.local(&listings)
            }
        };

        Ok(SearchResult {
            query: query.to_string(),
            products: listings,
            credit_card_recommendations: analysis.recommendations,
            best_deal: analysis.best_deal,
            analysis_source: analysis.source,
            real_data_fetched: false,
            timestamp: Utc::now(),
            raw_response: None,
        })
    }

    pub fn suggestions(&self, input: &str) -> Vec<String> {
        if input.chars().count() < MIN_SUGGESTION_INPUT {
            return Vec::new();
        }
        catalog::suggestions(input)
    }

    /// Best card for a purchase of `amount` rupees in `category`.
    pub async fn card_advice(&self, category: &str, amount: u64) -> CardAdvice {
        let prompt = crate::analyzer::prompt::card_advice_prompt(category, amount);
        let advice = match self
            .analyzer
            .chain()
            .generate(&prompt, GenerationOptions::CARD_ADVICE)
            .await
        {
            Ok(text) => decode::<RemoteCardAdvice>(&text).and_then(|advice| {
                validate_card_advice(&advice)?;
                Ok(advice)
            }),
            Err(e) => {
                warn!("Card advice request failed: {}", e);
                return fallback_advice(category, amount);
            }
        };

        match advice {
            Ok(advice) => CardAdvice {
                card_name: advice.card_name,
                issuer: advice.issuer,
                cashback_rate: advice.cashback_rate,
                calculated_savings: advice.calculated_savings,
                category: if advice.category.is_empty() {
                    category.to_string()
                } else {
                    advice.category
                },
                why_best: advice.why_best,
            },
            Err(e) => {
                warn!("Rejected card advice, using fallback: {}", e);
                fallback_advice(category, amount)
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceInitError {
    #[error(transparent)]
    Scraper(#[from] ScraperError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

fn remote_listing(
    query: &str,
    name: String,
    price: &str,
    retailer: &str,
    url: Option<String>,
    features: &[String],
) -> Listing {
    Listing {
        name,
        price: price.trim().to_string(),
        original_price: None,
        retailer: retailer.trim().to_string(),
        url: url.unwrap_or_default(),
        retailer_logo: String::new(),
        retailer_color: String::new(),
        features: features.to_vec(),
        availability: "Check retailer".to_string(),
        rating: 0.0,
        reviews: 0,
        discount: None,
        delivery: None,
        image: Some(catalog::product_image(query)),
    }
}

/// Deterministic stand-in when a provider answered but not in the expected shape.
fn placeholder_result(query: &str, raw: String) -> SearchResult {
    let listing = Listing {
        name: query.to_string(),
        price: "Price information being fetched...".to_string(),
        original_price: None,
        retailer: "Multiple retailers".to_string(),
        url: String::new(),
        retailer_logo: String::new(),
        retailer_color: String::new(),
        features: vec!["AI-powered search results".to_string(), "Real-time pricing".to_string()],
        availability: String::new(),
        rating: 0.0,
        reviews: 0,
        discount: None,
        delivery: None,
        image: Some(catalog::product_image(query)),
    };
    let recommendation = CardRecommendation {
        product_index: 0,
        retailer: "General recommendation".to_string(),
        best_card: PLACEHOLDER_CARD.to_string(),
        cashback_rate: "2-5%".to_string(),
        expected_savings: CALCULATING.to_string(),
        category: "Online Shopping".to_string(),
        why_best: "Reliable cashback across online retailers".to_string(),
        apply_url: catalog::card_apply_url(PLACEHOLDER_CARD),
    };
    SearchResult {
        query: query.to_string(),
        products: vec![listing],
        credit_card_recommendations: vec![recommendation],
        best_deal: Some(BestDeal {
            product_index: 0,
            total_savings: CALCULATING.to_string(),
            final_price: "Best price being found...".to_string(),
            reason: "AI is analyzing the best deals for you".to_string(),
        }),
        analysis_source: AnalysisSource::Placeholder,
        real_data_fetched: false,
        timestamp: Utc::now(),
        raw_response: Some(raw),
    }
}

fn fallback_advice(category: &str, amount: u64) -> CardAdvice {
    let savings = (amount as f64 * 0.05).round() as u64;
    CardAdvice {
        card_name: "SBI SimplyCLICK".to_string(),
        issuer: "SBI".to_string(),
        cashback_rate: "5%".to_string(),
        calculated_savings: crate::utils::format_rupees(savings),
        category: category.to_string(),
        why_best: "Reliable cashback card for online purchases".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::{StubGenerator, chain};
    use crate::provider::{DeepSeekClient, GeminiClient, TextGenerator};
    use reqwest::Client;
    use std::sync::Arc;
    use std::time::Duration;

    fn service_with(aggregator: ListingAggregator, chain: ProviderChain) -> SearchService {
        let analyzer = Analyzer::new(CardRules::from_config(&AppConfig::default()), chain);
        SearchService::new(aggregator, analyzer)
    }

    fn default_aggregator() -> ListingAggregator {
        ListingAggregator::from_config(&AppConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn blank_query_is_rejected() {
        let service = service_with(default_aggregator(), ProviderChain::default());
        assert!(matches!(service.search("   ").await, Err(SearchError::EmptyQuery)));
    }

    #[tokio::test]
    async fn unreachable_providers_still_resolve_with_local_analysis() {
        let client = Client::builder().timeout(Duration::from_secs(2)).build().unwrap();
        let providers: Vec<Arc<dyn TextGenerator>> = vec![
            Arc::new(DeepSeekClient::new("key", client.clone()).with_base_url("http://127.0.0.1:9")),
            Arc::new(GeminiClient::new("key", client).with_base_url("http://127.0.0.1:9")),
        ];
        let service = service_with(default_aggregator(), ProviderChain::new(providers));

        let result = service.search("  iPhone 15 Pro Max  ").await.unwrap();
        assert_eq!(result.query, "iPhone 15 Pro Max");
        assert_eq!(result.analysis_source, AnalysisSource::Local);
        assert!(result.real_data_fetched);
        assert_eq!(result.products.len(), 4);
        assert_eq!(result.products[0].price, "₹1,51,905");
        assert_eq!(result.best_deal.unwrap().final_price, "₹1,44,310");
    }

    #[tokio::test]
    async fn no_listings_and_no_providers_is_the_only_hard_failure() {
        let service = service_with(ListingAggregator::new(Vec::new()), ProviderChain::default());
        assert!(matches!(
            service.search("iphone").await,
            Err(SearchError::AllProvidersUnavailable)
        ));
    }

    #[tokio::test]
    async fn ai_only_search_builds_listings_from_the_response() {
        let reply = r#"{
          "products": [
            {"name": "Kettle A", "price": "₹1,299", "retailer": "Amazon India", "features": ["1.5L"]},
            {"name": "Kettle B", "price": "₹1,199", "retailer": "Croma"}
          ],
          "creditCardRecommendations": [
            {"productIndex": 0, "retailer": "Amazon India", "bestCard": "ICICI Amazon Pay Credit Card", "cashbackRate": "5%"}
          ]
        }"#;
        let service = service_with(
            ListingAggregator::new(Vec::new()),
            chain(vec![StubGenerator::ok("deepseek", reply)]),
        );

        let result = service.search("electric kettle").await.unwrap();
        assert!(!result.real_data_fetched);
        assert_eq!(result.products.len(), 2);
        // one recommendation for two products is rejected, local rules apply
        assert_eq!(result.analysis_source, AnalysisSource::Local);
        assert_eq!(result.credit_card_recommendations[1].best_card, "HDFC Millennia Credit Card");
        // 1299 - 64 = 1235 vs 1199 - 29 = 1170
        assert_eq!(result.best_deal.unwrap().product_index, 1);
    }

    #[tokio::test]
    async fn absurd_remote_price_is_priced_without_overflow() {
        let reply = r#"{"products":[{"name":"Kettle","price":"₹9999999999999999999","retailer":"Amazon India"}]}"#;
        let service = service_with(
            ListingAggregator::new(Vec::new()),
            chain(vec![StubGenerator::ok("deepseek", reply)]),
        );

        let result = service.search("kettle").await.unwrap();
        assert_eq!(result.credit_card_recommendations[0].expected_savings, "₹4,99,99,99,99,99,99,99,999");
        assert_eq!(result.best_deal.unwrap().product_index, 0);
    }

    #[tokio::test]
    async fn prose_only_answer_yields_placeholder() {
        let service = service_with(
            ListingAggregator::new(Vec::new()),
            chain(vec![StubGenerator::ok("gemini", "Try Amazon, it's usually cheap.")]),
        );
        let result = service.search("kettle").await.unwrap();
        assert_eq!(result.analysis_source, AnalysisSource::Placeholder);
        assert_eq!(result.credit_card_recommendations[0].best_card, PLACEHOLDER_CARD);
        assert_eq!(result.raw_response.as_deref(), Some("Try Amazon, it's usually cheap."));
    }

    #[test]
    fn short_inputs_get_no_suggestions() {
        let service = service_with(default_aggregator(), ProviderChain::default());
        assert!(service.suggestions("i").is_empty());
        assert_eq!(service.suggestions("nike air").len(), 3);
    }

    #[tokio::test]
    async fn card_advice_falls_back_without_providers() {
        let service = service_with(default_aggregator(), ProviderChain::default());
        let advice = service.card_advice("Travel", 12_345).await;
        assert_eq!(advice.card_name, "SBI SimplyCLICK");
        assert_eq!(advice.calculated_savings, "₹617");
        assert_eq!(advice.category, "Travel");
    }

    #[tokio::test]
    async fn card_advice_uses_a_valid_remote_answer() {
        let reply = r#"Sure: {"cardName": "Axis Bank Atlas", "issuer": "Axis Bank", "cashbackRate": "5%", "calculatedSavings": "₹2,500", "whyBest": "Miles on travel"}"#;
        let service = service_with(default_aggregator(), chain(vec![StubGenerator::ok("deepseek", reply)]));
        let advice = service.card_advice("Travel", 50_000).await;
        assert_eq!(advice.card_name, "Axis Bank Atlas");
        assert_eq!(advice.category, "Travel");
    }
}
