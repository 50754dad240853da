// Analyzer module: card choice per listing, savings and the best deal.

pub mod card_rules;
pub mod deal;
pub mod extract;
pub mod prompt;

pub use card_rules::CardRules;
pub use deal::{CardChoice, price_out};

use crate::model::{AnalysisSource, BestDeal, CardRecommendation, Listing};
use crate::provider::{GenerationOptions, ProviderChain};
use extract::{RemoteAnalysis, decode, validate_recommendations};
use tracing::{info, warn};

/// Outcome of analysing one set of listings.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub recommendations: Vec<CardRecommendation>,
    pub best_deal: Option<BestDeal>,
    pub source: AnalysisSource,
}

pub struct Analyzer {
    rules: CardRules,
    chain: ProviderChain,
}

impl Analyzer {
    pub fn new(rules: CardRules, chain: ProviderChain) -> Self {
        Self { rules, chain }
    }

    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    /// Asks the providers which card fits each listing. Whatever goes wrong on
    /// the way (no provider, no JSON, bad schema, answer that doesn't match the
    /// listings) ends in the local rule table instead of an error.
    pub async fn analyze(&self, query: &str, listings: &[Listing]) -> Analysis {
        if listings.is_empty() || self.chain.is_empty() {
            return self.local(listings);
        }

        let prompt = prompt::analysis_prompt(query, listings);
        let text = match self.chain.generate(&prompt, GenerationOptions::ANALYSIS).await {
            Ok(text) => text,
            Err(e) => {
                warn!("AI analysis failed, using local card rules: {}", e);
                return self.local(listings);
            }
        };

        let choices = decode::<RemoteAnalysis>(&text)
            .and_then(|remote| validate_recommendations(&remote.credit_card_recommendations, listings));
        match choices {
            Ok(choices) => {
                info!("Using AI card recommendations for {} listings", listings.len());
                self.priced(listings, &choices, AnalysisSource::Remote)
            }
            Err(e) => {
                warn!("Rejected AI analysis, using local card rules: {}", e);
                self.local(listings)
            }
        }
    }

    pub fn local(&self, listings: &[Listing]) -> Analysis {
        let choices = self.rules.choose(listings);
        self.priced(listings, &choices, AnalysisSource::Local)
    }

    pub fn priced(&self, listings: &[Listing], choices: &[CardChoice], source: AnalysisSource) -> Analysis {
        let (recommendations, best_deal) = price_out(listings, choices);
        Analysis {
            recommendations,
            best_deal,
            source,
        }
    }
}
