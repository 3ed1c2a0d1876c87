pub mod classifier;
pub mod extractor;
pub mod fetcher;
pub mod locator;
pub mod markup;
pub mod parser;
pub mod retail;
pub mod sources;
pub mod text;
pub mod title_resolver;

use serde::{Deserialize, Serialize};

use self::locator::LocateStrategy;

/// An offer that passed every discovery filter and is ready to be stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScrapedOffer {
    pub source: String,
    pub title: Option<String>,
    pub url: String,
    pub price: String,
    pub shop: String,
    pub image_url: Option<String>,
    pub coupon: Option<String>,
}

/// Retailers the bot knows how to scrape and tag with affiliate parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Shop {
    Kabum,
    Pichau,
    Amazon,
}

impl Shop {
    /// Human readable label stored in `offers.shop`
    pub fn label(&self) -> &'static str {
        match self {
            Shop::Kabum => "KaBuM",
            Shop::Pichau => "Pichau",
            Shop::Amazon => "Amazon",
        }
    }

    /// Collector name stored in `offers.source`
    pub fn source_name(&self) -> &'static str {
        match self {
            Shop::Kabum => "kabum",
            Shop::Pichau => "pichau",
            Shop::Amazon => "amazon",
        }
    }
}

/// Per-retailer traversal rules. One locator/extractor pair serves every
/// source; only this value differs between them.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub shop: Shop,
    pub pages: Vec<String>,
    pub strategy: LocateStrategy,
    /// Maximum number of elements inspected while walking up from an anchor
    pub max_depth: usize,
    /// When non-empty, only links containing one of these substrings count
    pub link_markers: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub user_agent: String,
    pub retry_max: u32,
    pub retry_delay_ms: u64,
    pub loose_coupon_detection: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: "OfertasBot/1.0 (+contato)".to_string(),
            retry_max: 2,
            retry_delay_ms: 1000,
            loose_coupon_detection: false,
        }
    }
}
