// Core structs: Listing, CardRecommendation, SearchResult and the error enums
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One retailer's offer for the searched product. Lives for a single search response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub name: String,
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,
    pub retailer: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub retailer_logo: String,
    #[serde(default)]
    pub retailer_color: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub availability: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardRecommendation {
    pub product_index: usize,
    pub retailer: String,
    pub best_card: String,
    pub cashback_rate: String,
    pub expected_savings: String,
    pub category: String,
    pub why_best: String,
    pub apply_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BestDeal {
    pub product_index: usize,
    pub total_savings: String,
    pub final_price: String,
    pub reason: String,
}

/// Where the card recommendations of a result came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    Remote,
    Local,
    Placeholder,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub query: String,
    pub products: Vec<Listing>,
    pub credit_card_recommendations: Vec<CardRecommendation>,
    pub best_deal: Option<BestDeal>,
    pub analysis_source: AnalysisSource,
    pub real_data_fetched: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

/// Standalone card suggestion for a purchase category and amount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardAdvice {
    pub card_name: String,
    pub issuer: String,
    pub cashback_rate: String,
    pub calculated_savings: String,
    pub category: String,
    pub why_best: String,
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("http error: {0}")]
    HttpError(String),
    #[error("unexpected status {0}")]
    InvalidResponse(u16),
    #[error("parse error: {0}")]
    Parse(#[from] ParserError),
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("html parse error: {0}")]
    HtmlParseError(String),
    #[error("no listings found in page")]
    NoListings,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} request failed: {message}")]
    Http { provider: &'static str, message: String },
    #[error("{provider} responded with status {status}")]
    Status { provider: &'static str, status: u16 },
    #[error("{provider} returned an unexpected payload: {message}")]
    Payload { provider: &'static str, message: String },
    #[error("all text-generation providers are unavailable")]
    AllUnavailable,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search query is empty")]
    EmptyQuery,
    #[error("all AI services are unavailable")]
    AllProvidersUnavailable,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity provider request failed: {0}")]
    Http(String),
    #[error("identity provider responded with status {0}")]
    Status(u16),
    #[error("invalid identity provider url: {0}")]
    InvalidUrl(String),
}
