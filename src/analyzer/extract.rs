//! Turning free-form provider text into validated, typed answers.
//!
//! Providers are asked for JSON but answer in prose, so the outermost
//! `{ ... }` span is cut out first, decoded into a strict schema, and then
//! checked against the listings it talks about. Anything that fails is
//! rejected as a whole.

use crate::analyzer::deal::CardChoice;
use crate::model::Listing;
use crate::utils::{parse_price, parse_rate_bps};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no JSON object in response")]
    NoJson,
    #[error("response does not match schema: {0}")]
    Schema(#[from] serde_json::Error),
    #[error("response failed validation: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRecommendation {
    pub product_index: usize,
    pub retailer: String,
    pub best_card: String,
    pub cashback_rate: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub why_best: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAnalysis {
    pub credit_card_recommendations: Vec<RemoteRecommendation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteProduct {
    pub name: String,
    pub price: String,
    pub retailer: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSearch {
    pub products: Vec<RemoteProduct>,
    #[serde(default)]
    pub credit_card_recommendations: Vec<RemoteRecommendation>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCardAdvice {
    pub card_name: String,
    pub issuer: String,
    pub cashback_rate: String,
    pub calculated_savings: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub why_best: String,
}

/// The span from the first `{` to the last `}`, inclusive.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ExtractError> {
    let json = extract_json_object(text).ok_or(ExtractError::NoJson)?;
    Ok(serde_json::from_str(json)?)
}

/// Every listing must be covered exactly once, by its own retailer, with a
/// named card and a rate between 0 and 100 %. Returns the choices in listing order.
pub fn validate_recommendations(
    recommendations: &[RemoteRecommendation],
    listings: &[Listing],
) -> Result<Vec<CardChoice>, ExtractError> {
    if recommendations.len() != listings.len() {
        return Err(ExtractError::Invalid(format!(
            "expected {} recommendations, got {}",
            listings.len(),
            recommendations.len()
        )));
    }

    let mut slots: Vec<Option<CardChoice>> = vec![None; listings.len()];
    let mut seen = HashSet::new();

    for rec in recommendations {
        let listing = listings.get(rec.product_index).ok_or_else(|| {
            ExtractError::Invalid(format!("productIndex {} out of range", rec.product_index))
        })?;
        if !seen.insert(rec.product_index) {
            return Err(ExtractError::Invalid(format!(
                "productIndex {} recommended twice",
                rec.product_index
            )));
        }
        if rec.retailer.trim().to_lowercase() != listing.retailer.trim().to_lowercase() {
            return Err(ExtractError::Invalid(format!(
                "retailer '{}' does not match listing {} ('{}')",
                rec.retailer, rec.product_index, listing.retailer
            )));
        }
        if rec.best_card.trim().is_empty() {
            return Err(ExtractError::Invalid(format!(
                "empty card name for listing {}",
                rec.product_index
            )));
        }
        if parse_rate_bps(&rec.cashback_rate).is_none() {
            return Err(ExtractError::Invalid(format!(
                "unreadable cashback rate '{}'",
                rec.cashback_rate
            )));
        }

        slots[rec.product_index] = Some(CardChoice {
            card: rec.best_card.trim().to_string(),
            rate: rec.cashback_rate.trim().to_string(),
            category: rec.category.clone(),
            why_best: rec
                .why_best
                .clone()
                .unwrap_or_else(|| format!("Recommended for {}", listing.retailer)),
        });
    }

    // len check + uniqueness + range means every slot is filled
    Ok(slots.into_iter().flatten().collect())
}

pub fn validate_products(search: &RemoteSearch) -> Result<(), ExtractError> {
    if search.products.is_empty() {
        return Err(ExtractError::Invalid("no products".into()));
    }
    for (index, product) in search.products.iter().enumerate() {
        if product.name.trim().is_empty() || product.retailer.trim().is_empty() {
            return Err(ExtractError::Invalid(format!("product {} lacks name or retailer", index)));
        }
        if parse_price(&product.price).is_none() {
            return Err(ExtractError::Invalid(format!(
                "product {} has unreadable price '{}'",
                index, product.price
            )));
        }
    }
    Ok(())
}

pub fn validate_card_advice(advice: &RemoteCardAdvice) -> Result<(), ExtractError> {
    if advice.card_name.trim().is_empty() {
        return Err(ExtractError::Invalid("empty card name".into()));
    }
    if parse_rate_bps(&advice.cashback_rate).is_none() {
        return Err(ExtractError::Invalid(format!(
            "unreadable cashback rate '{}'",
            advice.cashback_rate
        )));
    }
    Ok(())
}
