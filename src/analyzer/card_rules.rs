use crate::analyzer::deal::CardChoice;
use crate::config::{AppConfig, CardRuleConfig};
use crate::model::Listing;

/// Ordered retailer → card table. The first rule whose substring appears in
/// the retailer name wins; otherwise the default card applies.
#[derive(Debug, Clone)]
pub struct CardRules {
    rules: Vec<CardRuleConfig>,
    default: CardRuleConfig,
}

impl CardRules {
    pub fn new(rules: Vec<CardRuleConfig>, default: CardRuleConfig) -> Self {
        Self { rules, default }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.card_rules.clone(), config.default_card.clone())
    }

    pub fn rule_for(&self, retailer: &str) -> &CardRuleConfig {
        self.rules
            .iter()
            .find(|rule| !rule.retailer_contains.is_empty() && retailer.contains(&rule.retailer_contains))
            .unwrap_or(&self.default)
    }

    pub fn choose(&self, listings: &[Listing]) -> Vec<CardChoice> {
        listings
            .iter()
            .map(|listing| {
                let rule = self.rule_for(&listing.retailer);
                CardChoice {
                    card: rule.card.clone(),
                    rate: rule.rate.clone(),
                    category: rule.category.clone(),
                    why_best: format!("Best cashback rate for {}", listing.retailer),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn rules() -> CardRules {
        CardRules::from_config(&AppConfig::default())
    }

    #[test]
    fn amazon_retailers_get_the_amazon_card() {
        let rules = rules();
        for retailer in ["Amazon India", "Amazon", "Amazon Fresh"] {
            let rule = rules.rule_for(retailer);
            assert_eq!(rule.card, "ICICI Amazon Pay Credit Card");
            assert_eq!(rule.rate, "5%");
        }
    }

    #[test]
    fn other_retailers_follow_the_table() {
        let rules = rules();
        assert_eq!(rules.rule_for("Flipkart").card, "Axis Bank Flipkart Credit Card");
        assert_eq!(rules.rule_for("Croma").rate, "2.5%");
        assert_eq!(rules.rule_for("Reliance Digital").card, "SBI SimplyCLICK Credit Card");
        // matching is case-sensitive, as in the rule table
        assert_eq!(rules.rule_for("amazon.in").card, "SBI SimplyCLICK Credit Card");
    }

    #[test]
    fn empty_substring_never_matches() {
        let rules = CardRules::new(
            vec![CardRuleConfig {
                retailer_contains: String::new(),
                card: "Catch-all".into(),
                rate: "9%".into(),
                category: "Any".into(),
            }],
            crate::config::default_card(),
        );
        assert_eq!(rules.rule_for("Croma").card, "SBI SimplyCLICK Credit Card");
    }
}
