//! Process configuration, read once from the environment at startup.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::scrapers::classifier::KeywordFilter;
use crate::scrapers::sources::default_sources;
use crate::scrapers::{ScraperConfig, Shop, SourceConfig};
use crate::services::display::AffiliateRule;

type ConfigResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub sources: Vec<SourceConfig>,
    pub filter: KeywordFilter,
    pub scraper: ScraperConfig,
    /// Sleep after a full pass over every source
    pub interval: Duration,
    /// Pause between two sources, a rate limit toward the retailers
    pub source_pause: Duration,
    pub fetch_timeout: Duration,
    pub title_fetch_timeout: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            filter: KeywordFilter::default(),
            scraper: ScraperConfig::default(),
            interval: Duration::from_secs(600),
            source_pause: Duration::from_secs(1),
            fetch_timeout: Duration::from_secs(20),
            title_fetch_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    pub target_chat_id: String,
    pub batch_size: u64,
    /// Sleep after a processed batch
    pub post_interval: Duration,
    /// Sleep when nothing is waiting
    pub idle_poll: Duration,
    pub send_pause: Duration,
    pub failure_pause: Duration,
    pub error_backoff: Duration,
    pub affiliates: Vec<AffiliateRule>,
}

impl DeliveryConfig {
    pub fn new(target_chat_id: impl Into<String>) -> Self {
        Self {
            target_chat_id: target_chat_id.into(),
            batch_size: 10,
            post_interval: Duration::from_secs(60 * 20),
            idle_poll: Duration::from_secs(10),
            send_pause: Duration::from_secs(2),
            failure_pause: Duration::from_secs(5),
            error_backoff: Duration::from_secs(10),
            affiliates: vec![],
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram_token: String,
    pub database_url: String,
    pub port: u16,
    pub discovery: DiscoveryConfig,
    pub delivery: DeliveryConfig,
}

impl AppConfig {
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let telegram_token = get("TELEGRAM_TOKEN").ok_or("TELEGRAM_TOKEN must be set")?;
        let target_chat_id = get("TARGET_CHAT_ID").ok_or("TARGET_CHAT_ID must be set")?;

        let database_url = database_url(&get);

        let mut discovery = DiscoveryConfig::default();
        discovery.filter = KeywordFilter::from_overrides(
            get("FILTER_KEYWORDS").as_deref(),
            get("FILTER_BLACKLIST").as_deref(),
        );
        discovery.interval = secs(&get, "DISCOVERY_INTERVAL_SECONDS", discovery.interval)?;
        discovery.source_pause = secs(&get, "SOURCE_PAUSE_SECONDS", discovery.source_pause)?;
        discovery.fetch_timeout = secs(&get, "FETCH_TIMEOUT_SECONDS", discovery.fetch_timeout)?;
        discovery.title_fetch_timeout =
            secs(&get, "TITLE_FETCH_TIMEOUT_SECONDS", discovery.title_fetch_timeout)?;
        discovery.scraper.retry_max = parse(&get, "FETCH_RETRY_MAX", discovery.scraper.retry_max)?;
        discovery.scraper.loose_coupon_detection = flag(&get, "ENABLE_LOOSE_COUPON", false)?;

        let mut delivery = DeliveryConfig::new(target_chat_id);
        delivery.batch_size = parse(&get, "DELIVERY_BATCH_SIZE", delivery.batch_size)?;
        delivery.post_interval = secs(&get, "POST_INTERVAL_SECONDS", delivery.post_interval)?;
        delivery.idle_poll = secs(&get, "IDLE_POLL_SECONDS", delivery.idle_poll)?;
        delivery.affiliates = [
            (Shop::Amazon, "amazon.com.br", "tag", "AFF_AMAZON_TAG"),
            (Shop::Kabum, "kabum.com.br", "aff", "AFF_KABUM"),
            (Shop::Pichau, "pichau.com.br", "aff", "AFF_PICHAU"),
        ]
        .into_iter()
        .filter_map(|(shop, domain, param, key)| {
            get(key).map(|value| AffiliateRule::new(shop, domain, param, value))
        })
        .collect();

        Ok(Self {
            telegram_token,
            database_url,
            port: parse(&get, "PORT", 10000)?,
            discovery,
            delivery,
        })
    }
}

/// Database location only, for tools that never talk to Telegram
pub fn database_url_from_env() -> String {
    database_url(&|key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty()))
}

fn database_url<G>(get: &G) -> String
where
    G: Fn(&str) -> Option<String>,
{
    match get("DATABASE_URL") {
        Some(url) => url,
        None => {
            let path = get("DB_PATH").unwrap_or_else(|| "offers.db".to_string());
            format!("sqlite://{}?mode=rwc", path)
        }
    }
}

fn parse<T, G>(get: &G, key: &str, default: T) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| format!("Invalid value for {}: {:?} ({})", key, raw, e).into()),
        None => Ok(default),
    }
}

fn secs<G>(get: &G, key: &str, default: Duration) -> ConfigResult<Duration>
where
    G: Fn(&str) -> Option<String>,
{
    parse(get, key, default.as_secs()).map(Duration::from_secs)
}

fn flag<G>(get: &G, key: &str, default: bool) -> ConfigResult<bool>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|v| v.to_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(format!("Invalid value for {}: {:?} (expected true/false)", key, v).into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ConfigResult<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_credentials_are_fatal() {
        assert!(config_from(&[]).is_err());
        assert!(config_from(&[("TELEGRAM_TOKEN", "t")]).is_err());
        assert!(config_from(&[("TELEGRAM_TOKEN", " "), ("TARGET_CHAT_ID", "@c")]).is_err());
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("TELEGRAM_TOKEN", "t"), ("TARGET_CHAT_ID", "@canal")]).unwrap();
        assert_eq!(config.database_url, "sqlite://offers.db?mode=rwc");
        assert_eq!(config.port, 10000);
        assert_eq!(config.delivery.post_interval, Duration::from_secs(1200));
        assert_eq!(config.delivery.batch_size, 10);
        assert_eq!(config.discovery.interval, Duration::from_secs(600));
        assert_eq!(config.discovery.sources.len(), 3);
        assert!(config.delivery.affiliates.is_empty());
        assert!(!config.discovery.scraper.loose_coupon_detection);
        assert_eq!(config.discovery.filter, KeywordFilter::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("TELEGRAM_TOKEN", "t"),
            ("TARGET_CHAT_ID", "-100123"),
            ("DB_PATH", "/data/bot.db"),
            ("POST_INTERVAL_SECONDS", "60"),
            ("AFF_KABUM", "abc"),
            ("FILTER_BLACKLIST", "Cabo,Adaptador"),
            ("ENABLE_LOOSE_COUPON", "yes"),
            ("PORT", "8080"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "sqlite:///data/bot.db?mode=rwc");
        assert_eq!(config.delivery.post_interval, Duration::from_secs(60));
        assert_eq!(config.delivery.affiliates.len(), 1);
        assert_eq!(config.delivery.affiliates[0].shop, Shop::Kabum);
        assert_eq!(config.discovery.filter.blacklist(), &["cabo".to_string(), "adaptador".to_string()]);
        assert!(config.discovery.scraper.loose_coupon_detection);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_malformed_numbers_are_rejected() {
        let result = config_from(&[
            ("TELEGRAM_TOKEN", "t"),
            ("TARGET_CHAT_ID", "@c"),
            ("POST_INTERVAL_SECONDS", "twenty"),
        ]);
        assert!(result.is_err());
    }
}
