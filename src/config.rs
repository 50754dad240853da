use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Static description of one retailer the synthesizer fabricates listings for.
#[derive(Debug, Clone, Deserialize)]
pub struct RetailerConfig {
    pub key: String,
    pub name: String,
    pub logo: String,
    pub color: String,
    pub search_url: String,
    pub query_param: String,
    pub price_factor: f64,
    pub original_price_factor: f64,
    pub discount: String,
    pub availability: String,
    pub delivery: String,
    pub rating_base: f64,
    pub rating_spread: f64,
    pub reviews_base: u32,
    pub reviews_spread: u32,
    /// Whether a live HTML parser exists for this retailer's search page.
    #[serde(default)]
    pub live: bool,
}

/// Retailer-name substring mapped to the card that pays the most there.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CardRuleConfig {
    #[serde(default)]
    pub retailer_contains: String,
    pub card: String,
    pub rate: String,
    pub category: String,
}

/// Remote text-generation endpoint. Unset `base_url`/`model` fall back to the
/// provider's public defaults; no `api_key` means the provider is skipped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub live_fetch: bool,
    pub proxy_url: String,
    pub request_timeout_seconds: u64,
    pub deepseek: ProviderConfig,
    pub gemini: ProviderConfig,
    pub supabase: SupabaseConfig,
    pub retailers: Vec<RetailerConfig>,
    pub card_rules: Vec<CardRuleConfig>,
    pub default_card: CardRuleConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".into(),
            live_fetch: false,
            proxy_url: "https://api.allorigins.win/raw".into(),
            request_timeout_seconds: 30,
            deepseek: ProviderConfig::default(),
            gemini: ProviderConfig::default(),
            supabase: SupabaseConfig::default(),
            retailers: default_retailers(),
            card_rules: default_card_rules(),
            default_card: default_card(),
        }
    }
}

impl AppConfig {
    /// Secrets may come from the environment instead of the config file.
    /// Non-empty variables win over file values.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(key) = get("DEEPSEEK_API_KEY") {
            self.deepseek.api_key = Some(key);
        }
        if let Some(key) = get("GEMINI_API_KEY") {
            self.gemini.api_key = Some(key);
        }
        if let Some(url) = get("SUPABASE_URL") {
            self.supabase.url = Some(url);
        }
        if let Some(key) = get("SUPABASE_ANON_KEY") {
            self.supabase.anon_key = Some(key);
        }
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: AppConfig = serde_json::from_str(&content)?;
    config.apply_env(|name| std::env::var(name).ok());
    Ok(config)
}

fn retailer(
    key: &str,
    name: &str,
    logo: &str,
    color: &str,
    search_url: &str,
    query_param: &str,
) -> RetailerConfig {
    RetailerConfig {
        key: key.into(),
        name: name.into(),
        logo: logo.into(),
        color: color.into(),
        search_url: search_url.into(),
        query_param: query_param.into(),
        price_factor: 1.0,
        original_price_factor: 1.1,
        discount: String::new(),
        availability: "In Stock".into(),
        delivery: String::new(),
        rating_base: 4.0,
        rating_spread: 0.8,
        reviews_base: 1000,
        reviews_spread: 5000,
        live: false,
    }
}

pub fn default_retailers() -> Vec<RetailerConfig> {
    vec![
        RetailerConfig {
            price_factor: 0.95,
            original_price_factor: 1.1,
            discount: "15% off".into(),
            delivery: "FREE Delivery by Tomorrow".into(),
            rating_base: 4.2,
            rating_spread: 0.6,
            reviews_base: 2000,
            reviews_spread: 8000,
            live: true,
            ..retailer(
                "amazon",
                "Amazon India",
                "https://upload.wikimedia.org/wikipedia/commons/a/a9/Amazon_logo.svg",
                "#FF9900",
                "https://www.amazon.in/s",
                "k",
            )
        },
        RetailerConfig {
            price_factor: 0.97,
            original_price_factor: 1.08,
            discount: "12% off".into(),
            delivery: "FREE Delivery in 2-3 days".into(),
            rating_base: 4.1,
            rating_spread: 0.7,
            reviews_base: 1500,
            reviews_spread: 6000,
            ..retailer(
                "flipkart",
                "Flipkart",
                "https://upload.wikimedia.org/wikipedia/en/7/7a/Flipkart_logo.svg",
                "#2874F0",
                "https://www.flipkart.com/search",
                "q",
            )
        },
        RetailerConfig {
            price_factor: 1.02,
            original_price_factor: 1.12,
            discount: "10% off".into(),
            availability: "Available in Store".into(),
            delivery: "Store Pickup Available".into(),
            rating_base: 4.0,
            rating_spread: 0.8,
            reviews_base: 800,
            reviews_spread: 3000,
            ..retailer(
                "croma",
                "Croma",
                "https://www.croma.com/medias/croma-logo.svg",
                "#7B68EE",
                "https://www.croma.com/search",
                "q",
            )
        },
        RetailerConfig {
            price_factor: 1.03,
            original_price_factor: 1.15,
            discount: "8% off".into(),
            availability: "Limited Stock".into(),
            delivery: "FREE Home Delivery".into(),
            rating_base: 3.9,
            rating_spread: 0.9,
            reviews_base: 600,
            reviews_spread: 2500,
            ..retailer(
                "reliance",
                "Reliance Digital",
                "https://www.reliancedigital.in/medias/RIL-Logo.svg",
                "#E31837",
                "https://www.reliancedigital.in/search",
                "q",
            )
        },
    ]
}

pub fn default_card_rules() -> Vec<CardRuleConfig> {
    let rule = |retailer: &str, card: &str, rate: &str, category: &str| CardRuleConfig {
        retailer_contains: retailer.into(),
        card: card.into(),
        rate: rate.into(),
        category: category.into(),
    };
    vec![
        rule("Amazon", "ICICI Amazon Pay Credit Card", "5%", "Amazon Shopping"),
        rule("Flipkart", "Axis Bank Flipkart Credit Card", "4%", "Flipkart Shopping"),
        rule("Croma", "HDFC Millennia Credit Card", "2.5%", "Electronics"),
    ]
}

pub fn default_card() -> CardRuleConfig {
    CardRuleConfig {
        retailer_contains: String::new(),
        card: "SBI SimplyCLICK Credit Card".into(),
        rate: "5%".into(),
        category: "Online Shopping".into(),
    }
}
