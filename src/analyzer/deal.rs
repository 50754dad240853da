// Savings arithmetic and best-deal selection
use crate::catalog::card_apply_url;
use crate::model::{BestDeal, CardRecommendation, Listing};
use crate::utils::{format_rupees, parse_price, parse_rate_bps};

/// The card picked for one listing, before any money is computed.
#[derive(Debug, Clone, PartialEq)]
pub struct CardChoice {
    pub card: String,
    pub rate: String,
    pub category: String,
    pub why_best: String,
}

/// `floor(price × rate / 100)` with the rate in basis points, so the floor is exact.
/// Rates never exceed 10 000 bps, so the quotient always fits back into `u64`.
pub fn savings(price: u64, rate_bps: u32) -> u64 {
    let saved = u128::from(price) * u128::from(rate_bps) / 10_000;
    u64::try_from(saved).unwrap_or(price)
}

/// Attaches savings to every listing and picks the one with the lowest final
/// price. `choices` is index-aligned with `listings`. Listings whose price
/// can't be read get zero savings and never win; ties keep the earliest one.
pub fn price_out(listings: &[Listing], choices: &[CardChoice]) -> (Vec<CardRecommendation>, Option<BestDeal>) {
    let mut recommendations = Vec::with_capacity(listings.len());
    let mut best: Option<(usize, u64, u64)> = None;

    for (index, (listing, choice)) in listings.iter().zip(choices).enumerate() {
        let price = parse_price(&listing.price);
        let rate = parse_rate_bps(&choice.rate).unwrap_or(0);
        let saved = price.map(|p| savings(p, rate)).unwrap_or(0);

        if let Some(price) = price {
            let final_price = price - saved;
            if best.is_none_or(|(_, _, current)| final_price < current) {
                best = Some((index, saved, final_price));
            }
        }

        recommendations.push(CardRecommendation {
            product_index: index,
            retailer: listing.retailer.clone(),
            best_card: choice.card.clone(),
            cashback_rate: choice.rate.clone(),
            expected_savings: format_rupees(saved),
            category: choice.category.clone(),
            why_best: choice.why_best.clone(),
            apply_url: card_apply_url(&choice.card),
        });
    }

    let best_deal = best.map(|(index, saved, final_price)| BestDeal {
        product_index: index,
        total_savings: format_rupees(saved),
        final_price: format_rupees(final_price),
        reason: format!(
            "Lowest final price with {} at {}",
            recommendations[index].best_card, listings[index].retailer
        ),
    });

    (recommendations, best_deal)
}
