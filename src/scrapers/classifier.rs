//! Relevance and promotion rules applied to every candidate offer

use lazy_static::lazy_static;
use regex::Regex;

use super::parser::has_price_range;
use super::text::{contains_term, normalize_text};

/// Components plus the peripherals that make sense on a hardware channel.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "placa de video", "placa de vídeo", "placa mãe", "placa mae", "motherboard",
    "gpu", "rtx", "gtx", "radeon", "rx", "vga",
    "ssd", "nvme", "m.2", "m2", "hd", "hdd",
    "memoria ram", "memória ram", "ram", "ddr4", "ddr5",
    "processador", "cpu", "cooler", "dissipador", "heatsink",
    "fonte", "psu", "gabinete", "case", "ventoinha", "fan",
    "placa de som", "placa de rede", "ssd nvme", "ssd sata", "ssd m2", "m.2 ssd",
    "teclado", "mouse", "monitor", "headset", "webcam", "mousepad",
    "fonte atx", "watercooler", "ssd externo",
];

pub const DEFAULT_BLACKLIST: &[&str] = &[
    "notebook", "laptop", "smartphone", "celular", "impressora",
    "televis", "tv", "geladeira", "airfryer", "console", "cadeira",
    "figurine", "funko", "roupa", "sapato", "tênis", "tenis",
    "power bank", "powerbank", "barra de proteina", "proteina", "suplemento",
];

const PROMO_WORDS: &[&str] = &[
    "off", "%", "desconto", "promo", "promocao", "black friday", "oferta", "ofertas",
    "flash", "cupom",
];

lazy_static! {
    static ref PERCENT_REGEX: Regex = Regex::new(r"\d{1,3}\s?%").unwrap();
}

/// Allow/deny keyword lists. Terms are stored normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordFilter {
    keywords: Vec<String>,
    blacklist: Vec<String>,
}

impl Default for KeywordFilter {
    fn default() -> Self {
        Self::new(
            DEFAULT_KEYWORDS.iter().copied(),
            DEFAULT_BLACKLIST.iter().copied(),
        )
    }
}

impl KeywordFilter {
    pub fn new<K, B, S>(keywords: K, blacklist: B) -> Self
    where
        K: IntoIterator<Item = S>,
        B: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: normalize_terms(keywords),
            blacklist: normalize_terms(blacklist),
        }
    }

    /// Build from optional comma separated overrides. A present override
    /// replaces the matching default list entirely.
    pub fn from_overrides(keywords: Option<&str>, blacklist: Option<&str>) -> Self {
        let defaults = Self::default();

        Self {
            keywords: keywords
                .map(|raw| normalize_terms(raw.split(',')))
                .filter(|terms| !terms.is_empty())
                .unwrap_or(defaults.keywords),
            blacklist: blacklist
                .map(|raw| normalize_terms(raw.split(',')))
                .filter(|terms| !terms.is_empty())
                .unwrap_or(defaults.blacklist),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn blacklist(&self) -> &[String] {
        &self.blacklist
    }

    /// Relevance over title, surrounding block text and link.
    /// A blacklist hit rejects even when an allowlist term is present.
    pub fn is_relevant(&self, title: Option<&str>, extra_text: &str, link: &str) -> bool {
        let combined = [title.unwrap_or(""), extra_text, link].join(" ");
        let plain = normalize_text(&combined);

        if self.blacklisted_term(&plain).is_some() {
            return false;
        }

        self.keywords.iter().any(|t| contains_term(&plain, t))
    }

    /// Blacklist only. Needs no listing context, so it holds for stored rows.
    pub fn is_blacklisted(&self, title: Option<&str>, link: &str) -> bool {
        let combined = [title.unwrap_or(""), link].join(" ");
        self.blacklisted_term(&normalize_text(&combined)).is_some()
    }

    fn blacklisted_term(&self, plain: &str) -> Option<&str> {
        let term = self.blacklist.iter().find(|t| contains_term(plain, t))?;
        tracing::trace!("Blacklisted term '{}' in '{}'", term, plain);
        Some(term.as_str())
    }
}

/// Promotional evidence: a percentage, a "de X por Y" range or promo vocabulary.
pub fn is_promotional(title: Option<&str>, extra_text: &str) -> bool {
    let combined = [title.unwrap_or(""), extra_text].join(" ");
    let plain = normalize_text(&combined);

    if PERCENT_REGEX.is_match(&plain) {
        return true;
    }

    if has_price_range(&combined) {
        return true;
    }

    PROMO_WORDS.iter().any(|w| contains_term(&plain, w))
}

fn normalize_terms<I, S>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = terms
        .into_iter()
        .map(|t| normalize_text(t.as_ref()))
        .filter(|t| !t.is_empty())
        .collect();
    normalized.dedup();
    normalized
}
