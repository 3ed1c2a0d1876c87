use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "R$ 1.234,56", "R$1234", "R$ 99,90"
    pub static ref PRICE_REGEX: Regex = Regex::new(
        r"R\$\s?(?:\d{1,3}(?:\.\d{3})+|\d+)(?:,\d{2})?"
    ).unwrap();

    // "de R$ 100,00 por R$ 80,00", "De: R$ 100 Por: R$ 80"
    pub static ref PRICE_RANGE_REGEX: Regex = Regex::new(
        r"(?i)\bde:?\s*(R\$\s?(?:\d{1,3}(?:\.\d{3})+|\d+)(?:,\d{2})?)\s*por:?\s*(R\$\s?(?:\d{1,3}(?:\.\d{3})+|\d+)(?:,\d{2})?)"
    ).unwrap();

    static ref AMOUNT_REGEX: Regex = Regex::new(r"^R\$\s?").unwrap();

    static ref COUPON_REGEX: Regex = Regex::new(
        r"(?i)(?:cupom|código|codigo|code|coupon)(?:\s*:\s*|\s+)([A-Z0-9\-]{4,16})\b"
    ).unwrap();

    // Unlabeled fallback, uppercase tokens only
    static ref LOOSE_COUPON_REGEX: Regex = Regex::new(r"\b[A-Z0-9]{4,16}\b").unwrap();
}

/// First single currency amount in `text`, normalized to `R$ <amount>`
pub fn extract_price(text: &str) -> Option<String> {
    let text = text.replace('\u{a0}', " ");
    PRICE_REGEX
        .find(&text)
        .map(|m| normalize_amount(m.as_str()))
}

/// A "de X por Y" range when present, otherwise the first single amount.
pub fn extract_price_or_range(text: &str) -> Option<String> {
    let text = text.replace('\u{a0}', " ");

    if let Some(caps) = PRICE_RANGE_REGEX.captures(&text) {
        return Some(format!(
            "de {} por {}",
            normalize_amount(&caps[1]),
            normalize_amount(&caps[2])
        ));
    }

    extract_price(&text)
}

/// True if the text carries a "de X por Y" price range
pub fn has_price_range(text: &str) -> bool {
    PRICE_RANGE_REGEX.is_match(&text.replace('\u{a0}', " "))
}

fn normalize_amount(raw: &str) -> String {
    let amount = AMOUNT_REGEX.replace(raw.trim(), "");
    format!("R$ {}", amount.trim())
}

/// Labeled coupon code ("cupom: ABC10"), upper-cased.
///
/// With `allow_unlabeled`, falls back to the first uppercase alphanumeric
/// token containing a letter. That fallback regularly picks up model numbers
/// and should be treated as a hint only.
pub fn detect_coupon(text: &str, allow_unlabeled: bool) -> Option<String> {
    let text = text.replace('\u{a0}', " ");

    if let Some(caps) = COUPON_REGEX.captures(&text) {
        return Some(caps[1].trim().to_uppercase());
    }

    if allow_unlabeled {
        return LOOSE_COUPON_REGEX
            .find_iter(&text)
            .map(|m| m.as_str())
            .find(|token| token.chars().any(|c| c.is_ascii_alphabetic()))
            .map(str::to_string);
    }

    None
}
