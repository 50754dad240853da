//! Static product tables the listing synthesizer and suggestion box read from.
//!
//! Every lookup lowercases the query and scans its table in order; the first
//! substring match wins.

use rand::Rng;

pub const DEFAULT_BASE_PRICE: u64 = 25000;
pub const MAX_SUGGESTIONS: usize = 5;

const BASE_PRICES: &[(&str, u64)] = &[
    ("iphone 15 pro max", 159900),
    ("iphone 15 pro", 134900),
    ("iphone 15", 79900),
    ("iphone 14 pro max", 139900),
    ("iphone 14 pro", 129900),
    ("iphone 14", 68999),
    ("iphone 13", 59900),
    ("iphone 12", 49900),
    ("iphone", 65000),
    ("samsung galaxy s24 ultra", 129999),
    ("samsung galaxy s24", 74999),
    ("samsung galaxy s23", 64999),
    ("samsung", 45000),
    ("macbook pro m3", 199900),
    ("macbook air m3", 114900),
    ("macbook", 150000),
    ("nike air jordan", 12995),
    ("nike air max", 8995),
    ("nike", 6500),
];

const NAME_VARIANTS: &[(&str, &[&str])] = &[
    (
        "iphone",
        &[
            "Apple iPhone 15 Pro Max (256GB) - Natural Titanium",
            "Apple iPhone 15 Pro (128GB) - Blue Titanium",
            "Apple iPhone 15 (128GB) - Pink",
            "Apple iPhone 14 Pro Max (256GB) - Deep Purple",
            "Apple iPhone 14 (128GB) - Blue",
            "Apple iPhone 13 (128GB) - Midnight",
        ],
    ),
    (
        "samsung",
        &[
            "Samsung Galaxy S24 Ultra 5G (256GB) - Titanium Gray",
            "Samsung Galaxy S24+ 5G (256GB) - Onyx Black",
            "Samsung Galaxy S23 FE (128GB) - Mint",
        ],
    ),
    (
        "nike",
        &[
            "Nike Air Jordan 1 Mid - Black/White",
            "Nike Air Max 90 - White/Black",
            "Nike Revolution 6 - Black/White",
        ],
    ),
];

const FEATURES: &[(&str, &[&str])] = &[
    (
        "iphone",
        &["A17 Pro chip", "6.7-inch Super Retina XDR", "Pro camera system", "5G enabled", "Face ID"],
    ),
    (
        "samsung",
        &["Snapdragon 8 Gen 3", "Dynamic AMOLED 2X", "Galaxy AI", "5G connectivity"],
    ),
    (
        "nike",
        &["Premium leather", "Air cushioning", "Rubber outsole", "Classic design"],
    ),
];

const DEFAULT_FEATURES: &[&str] = &["Premium quality", "Latest technology", "Warranty included"];
const FEATURE_LIMIT: usize = 3;

const IMG_IPHONE_PRO: &str = "https://images.unsplash.com/photo-1695048133142-1a20484d2569?w=400&h=400&fit=crop&auto=format&q=80";
const IMG_GALAXY: &str = "https://images.unsplash.com/photo-1610945415295-d9bbf067e59c?w=400&h=400&fit=crop&auto=format&q=80";
const IMG_MACBOOK_PRO: &str = "https://images.unsplash.com/photo-1541807084-5c52b6b3adef?w=400&h=400&fit=crop&auto=format&q=80";
const IMG_JORDAN: &str = "https://images.unsplash.com/photo-1549298916-b41d501d3772?w=400&h=400&fit=crop&auto=format&q=80";
const IMG_AIR_MAX: &str = "https://images.unsplash.com/photo-1595950653106-6c9ebd614d3a?w=400&h=400&fit=crop&auto=format&q=80";

const PRODUCT_IMAGES: &[(&[&str], &str)] = &[
    (&["iphone 15 pro max", "iphone 15 pro"], IMG_IPHONE_PRO),
    (
        &["iphone 15"],
        "https://images.unsplash.com/photo-1695048064449-54a20de4d853?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (
        &["iphone 14"],
        "https://images.unsplash.com/photo-1663781214977-4f4ac9b9c5de?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (
        &["iphone 13"],
        "https://images.unsplash.com/photo-1632633173522-20b55a1ed8ad?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (&["iphone"], IMG_IPHONE_PRO),
    (&["samsung galaxy s24"], IMG_GALAXY),
    (
        &["samsung galaxy s23"],
        "https://images.unsplash.com/photo-1598300042247-d088f8ab3a91?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (&["samsung"], IMG_GALAXY),
    (&["macbook pro m3"], IMG_MACBOOK_PRO),
    (
        &["macbook air m3"],
        "https://images.unsplash.com/photo-1517336714731-489689fd1ca8?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (&["macbook"], IMG_MACBOOK_PRO),
    (&["nike air jordan"], IMG_JORDAN),
    (&["nike air max"], IMG_AIR_MAX),
    (&["nike"], IMG_JORDAN),
    (
        &["galaxy buds"],
        "https://images.unsplash.com/photo-1590658268037-6bf12165a8df?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (
        &["laptop", "computer"],
        "https://images.unsplash.com/photo-1496181133206-80ce9b88a853?w=400&h=300&fit=crop&auto=format",
    ),
    (
        &["phone", "mobile"],
        "https://images.unsplash.com/photo-1511707171634-5f897ff02aa9?w=400&h=300&fit=crop&auto=format",
    ),
    (
        &["headphones", "earbuds"],
        "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=400&h=300&fit=crop&auto=format",
    ),
    (
        &["watch", "smartwatch"],
        "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=400&h=300&fit=crop&auto=format",
    ),
    (
        &["shoes", "sneakers"],
        "https://images.unsplash.com/photo-1549298916-b41d501d3772?w=400&h=300&fit=crop&auto=format",
    ),
];

const DEFAULT_IMAGE: &str = "https://images.unsplash.com/photo-1556742049-0cfed4f6a45d?w=400&h=300&fit=crop&auto=format";

/// Trigger keywords and the suggestion group each one unlocks.
const SUGGESTION_GROUPS: &[(&[&str], &[&str])] = &[
    (
        &["iphone", "apple"],
        &["iPhone 15 Pro Max", "iPhone 15 Pro", "iPhone 15", "iPhone 14 Pro Max", "iPhone 14", "iPhone 13"],
    ),
    (
        &["samsung"],
        &["Samsung Galaxy S24 Ultra", "Samsung Galaxy S24", "Samsung Galaxy A54", "Samsung Galaxy M34"],
    ),
    (
        &["nike"],
        &["Nike Air Jordan 1", "Nike Air Max 90", "Nike Revolution 6", "Nike Air Force 1"],
    ),
    (
        &["macbook"],
        &["MacBook Pro M3", "MacBook Air M3", "MacBook Pro 14-inch", "MacBook Air 13-inch"],
    ),
];

const CARD_APPLY_URLS: &[(&str, &str)] = &[
    (
        "ICICI Amazon Pay Credit Card",
        "https://www.icicibank.com/personal-banking/cards/credit-card/amazon-pay-credit-card",
    ),
    (
        "HDFC Millennia Credit Card",
        "https://www.hdfcbank.com/personal/pay/cards/credit-cards/millennia-credit-card",
    ),
    (
        "SBI SimplyCLICK Credit Card",
        "https://www.sbi.co.in/web/personal-banking/cards/credit-cards/rewards-credit-cards/simplyclick-advantage-reward-credit-card",
    ),
    (
        "Axis Bank Ace Credit Card",
        "https://www.axisbank.com/retail/cards/credit-card/ace-credit-card",
    ),
    (
        "HDFC Bank Regalia First Credit Card",
        "https://www.hdfcbank.com/personal/pay/cards/credit-cards/regalia-first-credit-card",
    ),
    (
        "Axis Bank My Zone Credit Card",
        "https://www.axisbank.com/retail/cards/credit-card/my-zone-credit-card",
    ),
    (
        "Axis Bank Flipkart Credit Card",
        "https://www.axisbank.com/retail/cards/credit-card/flipkart-credit-card",
    ),
];

const CARD_SEARCH_URL: &str = "https://www.google.com/search";

pub fn base_price(query: &str) -> u64 {
    let lower = query.to_lowercase();
    BASE_PRICES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, price)| *price)
        .unwrap_or(DEFAULT_BASE_PRICE)
}

/// Picks a product title for the query. Known families get one of their
/// variants at random, anything else echoes the query.
pub fn product_name<R: Rng>(query: &str, rng: &mut R) -> String {
    let lower = query.to_lowercase();
    match NAME_VARIANTS.iter().find(|(family, _)| lower.contains(family)) {
        Some((_, variants)) => variants[rng.random_range(0..variants.len())].to_string(),
        None => format!("{} - Premium Quality", query),
    }
}

pub fn features(query: &str) -> Vec<String> {
    let lower = query.to_lowercase();
    let tags = FEATURES
        .iter()
        .find(|(family, _)| lower.contains(family))
        .map(|(_, tags)| &tags[..FEATURE_LIMIT.min(tags.len())])
        .unwrap_or(DEFAULT_FEATURES);
    tags.iter().map(|t| t.to_string()).collect()
}

pub fn product_image(query: &str) -> String {
    let lower = query.to_lowercase();
    PRODUCT_IMAGES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, url)| *url)
        .unwrap_or(DEFAULT_IMAGE)
        .to_string()
}

/// Search-box suggestions: every group whose trigger appears in the input
/// contributes its entries, then only entries containing the input survive.
pub fn suggestions(input: &str) -> Vec<String> {
    let lower = input.to_lowercase();
    SUGGESTION_GROUPS
        .iter()
        .filter(|(triggers, _)| triggers.iter().any(|t| lower.contains(t)))
        .flat_map(|(_, entries)| entries.iter())
        .filter(|entry| entry.to_lowercase().contains(&lower))
        .take(MAX_SUGGESTIONS)
        .map(|entry| entry.to_string())
        .collect()
}

/// Bank application page for a card, or a web search when the card is unknown.
pub fn card_apply_url(card: &str) -> String {
    if let Some((_, url)) = CARD_APPLY_URLS.iter().find(|(name, _)| *name == card) {
        return url.to_string();
    }
    let query = format!("{} apply online", card);
    crate::utils::search_url(CARD_SEARCH_URL, "q", &query)
        .unwrap_or_else(|| CARD_SEARCH_URL.to_string())
}
