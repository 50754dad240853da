// Prompts sent to the text-generation providers
use crate::model::Listing;
use crate::utils::format_rupees;

pub fn analysis_prompt(query: &str, listings: &[Listing]) -> String {
    let lines: Vec<String> = listings
        .iter()
        .enumerate()
        .map(|(index, l)| {
            format!(
                "{}. [productIndex {}] {} at {} - {} (Rating: {:.1})",
                index + 1,
                index,
                l.name,
                l.retailer,
                l.price,
                l.rating
            )
        })
        .collect();

    format!(
        r#"Analyze these products and recommend the best credit card for maximum savings on each one.

SEARCH QUERY: "{query}"

PRODUCTS FOUND:
{products}

Return exactly one recommendation per product, using the productIndex shown and the exact retailer name.

Respond in JSON format:
{{
  "creditCardRecommendations": [
    {{
      "productIndex": 0,
      "retailer": "exact retailer name from above",
      "bestCard": "specific Indian credit card name",
      "cashbackRate": "X%",
      "category": "category that applies",
      "whyBest": "brief reason"
    }}
  ]
}}

Focus on real Indian credit cards like SBI SimplyCLICK, HDFC Millennia, Axis Bank Ace, ICICI Amazon Pay, etc."#,
        query = query,
        products = lines.join("\n")
    )
}

pub fn search_prompt(query: &str) -> String {
    format!(
        r#"As a smart shopping assistant for credit card rewards optimization, help find the best deals for "{query}".

Please provide:
1. Top 3-5 product recommendations with prices from different retailers
2. The best credit card to use for maximum savings at each retailer

Format the response as JSON with this structure:
{{
  "products": [
    {{
      "name": "Product name",
      "price": "₹12,999",
      "retailer": "Retailer name",
      "url": "Product URL if available",
      "features": ["key feature 1", "key feature 2"]
    }}
  ],
  "creditCardRecommendations": [
    {{
      "productIndex": 0,
      "retailer": "Retailer name",
      "bestCard": "Credit card name",
      "cashbackRate": "5%",
      "category": "Online Shopping"
    }}
  ]
}}

Focus on Indian retailers like Amazon India, Flipkart, etc. and popular Indian credit cards."#,
        query = query
    )
}

pub fn card_advice_prompt(category: &str, amount: u64) -> String {
    format!(
        r#"Recommend the best Indian credit card for a purchase of {amount} in the {category} category.

Provide the specific card name, cashback/rewards rate, and calculated savings.

Format as JSON:
{{
  "cardName": "Card name",
  "issuer": "Bank name",
  "cashbackRate": "X%",
  "calculatedSavings": "₹X",
  "category": "{category}",
  "whyBest": "Reason why this card is best"
}}"#,
        amount = format_rupees(amount),
        category = category
    )
}
