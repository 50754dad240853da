// Utility functions: rupee formatting and parsing
use reqwest::Url;

/// Formats an amount the way Indian storefronts display it: `₹1,51,905`,
/// keeping at most three fractional digits.
pub fn format_inr(amount: f64) -> String {
    let fixed = format!("{:.3}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::from("₹");
    if amount < 0.0 && (int_part != "0" || !frac.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_indian(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Whole-rupee variant of [`format_inr`].
pub fn format_rupees(amount: u64) -> String {
    format!("₹{}", group_indian(&amount.to_string()))
}

/// Last three digits form one group, everything before is grouped in pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (mut rest, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    while rest.len() > 2 {
        let (head, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = head;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Extracts whole rupees from a display price such as `₹65,549.05`.
/// Only the integer part counts; anything that doesn't start with a digit is `None`.
pub fn parse_price(display: &str) -> Option<u64> {
    let cleaned: String = display.chars().filter(|c| *c != '₹' && *c != ',').collect();
    let digits: String = cleaned
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Parses a cashback rate like `2.5%` into basis points (250).
/// Rates outside 0..=100 % are rejected.
pub fn parse_rate_bps(rate: &str) -> Option<u32> {
    let number: String = rate
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value: f64 = number.parse().ok()?;
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return None;
    }
    Some((value * 100.0).round() as u32)
}

/// Builds a retailer search URL with the query as a properly encoded parameter.
pub fn search_url(base: &str, param: &str, query: &str) -> Option<String> {
    Url::parse_with_params(base, &[(param, query)])
        .ok()
        .map(String::from)
}
