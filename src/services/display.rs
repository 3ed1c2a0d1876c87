//! Delivery-time presentation: display titles, affiliate links, captions.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use crate::entities::offers;
use crate::scrapers::Shop;
use crate::scrapers::text::{collapse_whitespace, unescape_entities};

pub const PLACEHOLDER_TITLE: &str = "Produto";
pub const OFFER_BUTTON_TEXT: &str = "Ver oferta 🛍️";

lazy_static! {
    static ref PROMO_TOKENS_REGEX: Regex = Regex::new(
        r"(?i)\b(?:ofertas?|promo[cç][aã]o|promo|black friday|flash sale|off)\b"
    ).unwrap();

    static ref PERCENT_REGEX: Regex = Regex::new(r"-?\s*\d{1,3}\s?%").unwrap();

    static ref PRICE_FRAGMENT_REGEX: Regex = Regex::new(
        r"(?i)(?:\b(?:de|por):?\s*)?R\$\s?[\d.,]*\d"
    ).unwrap();

    static ref MARKDOWN_CHARS_REGEX: Regex = Regex::new(r"[*`\[\]_]").unwrap();
}

/// Affiliate parameter appended to links of one retailer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffiliateRule {
    pub shop: Shop,
    pub domain: String,
    pub param: String,
    pub value: String,
}

impl AffiliateRule {
    pub fn new(shop: Shop, domain: &str, param: &str, value: impl Into<String>) -> Self {
        Self {
            shop,
            domain: domain.to_string(),
            param: param.to_string(),
            value: value.into(),
        }
    }

    fn matches_host(&self, host: &str) -> bool {
        host == self.domain || host.ends_with(&format!(".{}", self.domain))
    }
}

/// Short caption title: promo words, percentages and price fragments removed.
pub fn clean_title_for_display(raw_title: Option<&str>) -> String {
    let title = raw_title.map(unescape_entities).unwrap_or_default();
    let title = collapse_whitespace(&title.replace('\u{a0}', " "));

    let title = PRICE_FRAGMENT_REGEX.replace_all(&title, " ");
    let title = PERCENT_REGEX.replace_all(&title, " ");
    let title = PROMO_TOKENS_REGEX.replace_all(&title, " ");
    let title = MARKDOWN_CHARS_REGEX.replace_all(&title, "");

    let title = collapse_whitespace(&title);
    let title = title.trim_matches(|c: char| " -–—:;/|,".contains(c));

    if title.is_empty() {
        PLACEHOLDER_TITLE.to_string()
    } else {
        title.to_string()
    }
}

/// Append the retailer's affiliate parameter unless the link already has it.
/// Applying it more than once yields the same link.
pub fn apply_affiliate(link: &str, rules: &[AffiliateRule]) -> String {
    let Ok(mut url) = Url::parse(link) else {
        return link.to_string();
    };
    let Some(host) = url.host_str().map(str::to_lowercase) else {
        return link.to_string();
    };
    let Some(rule) = rules.iter().find(|r| r.matches_host(&host)) else {
        return link.to_string();
    };

    if rule.value.is_empty() || url.query_pairs().any(|(k, _)| k == rule.param.as_str()) {
        return link.to_string();
    }

    url.query_pairs_mut().append_pair(&rule.param, &rule.value);
    url.to_string()
}

/// Markdown caption plus the button target for one offer
#[derive(Debug, Clone, PartialEq)]
pub struct OfferMessage {
    pub text: String,
    pub button_url: String,
}

pub fn compose_message(offer: &offers::Model, rules: &[AffiliateRule]) -> OfferMessage {
    let title = clean_title_for_display(offer.title.as_deref());
    let price = offer.price.as_deref().unwrap_or_default();

    let mut text = format!("*{}*\n💸 *Preço:* {}", title, price);
    if let Some(coupon) = offer.coupon.as_deref().filter(|c| !c.trim().is_empty()) {
        text.push_str(&format!("\n🏷️ *Cupom:* `{}`", coupon.trim()));
    }

    OfferMessage {
        text,
        button_url: apply_affiliate(&offer.url, rules),
    }
}
