use scraper::Html;
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

use super::classifier::is_promotional;
use super::extractor::extract_fields;
use super::fetcher::PageFetcher;
use super::locator::locate_blocks;
use super::markup::MarkupNode;
use super::parser::{detect_coupon, extract_price_or_range};
use super::title_resolver::resolve_title;
use super::{ScrapedOffer, SourceConfig};
use crate::config::DiscoveryConfig;
use crate::services::offer_repository::OfferRepository;

/// Owned result of locating and extracting one block, safe to hold across
/// awaits (parsed documents are not `Send`).
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateBlock {
    pub title: Option<String>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeReport {
    pub pages_fetched: usize,
    pub candidates: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub rejected: usize,
}

/// Run the locator and extractor over one listing page
pub fn parse_listing_page(html: &str, page_url: &str, source: &SourceConfig) -> Vec<CandidateBlock> {
    let base = match Url::parse(page_url) {
        Ok(base) => base,
        Err(e) => {
            tracing::warn!("Invalid page url {}: {}", page_url, e);
            return vec![];
        }
    };

    let document = Html::parse_document(html);

    locate_blocks(&document, source)
        .iter()
        .map(|block| {
            let fields = extract_fields(block, &base);
            CandidateBlock {
                title: fields.title,
                link: fields.link,
                image: fields.image,
                text: block.node.flat_text(),
            }
        })
        .collect()
}

/// Collector for one retailer: fetch its listing pages, filter candidates,
/// store what survives.
pub struct RetailScraper {
    source: SourceConfig,
    config: Arc<DiscoveryConfig>,
    fetcher: Arc<dyn PageFetcher>,
    offers: OfferRepository,
}

impl RetailScraper {
    pub fn new(
        source: SourceConfig,
        config: Arc<DiscoveryConfig>,
        fetcher: Arc<dyn PageFetcher>,
        offers: OfferRepository,
    ) -> Self {
        Self {
            source,
            config,
            fetcher,
            offers,
        }
    }

    fn label(&self) -> &'static str {
        self.source.shop.label()
    }

    pub async fn scrape(&self) -> ScrapeReport {
        let mut report = ScrapeReport::default();
        let mut seen = HashSet::new();

        for page in &self.source.pages {
            let Some(html) = self.fetcher.fetch(page, self.config.fetch_timeout).await else {
                continue;
            };
            report.pages_fetched += 1;

            let candidates = parse_listing_page(&html, page, &self.source);
            tracing::debug!("{}: {} candidate blocks on {}", self.label(), candidates.len(), page);

            for candidate in candidates {
                self.process_candidate(candidate, &mut seen, &mut report).await;
            }
        }

        report
    }

    async fn process_candidate(
        &self,
        candidate: CandidateBlock,
        seen: &mut HashSet<String>,
        report: &mut ScrapeReport,
    ) {
        let Some(link) = candidate.link else {
            return;
        };
        if !seen.insert(link.clone()) {
            return;
        }
        report.candidates += 1;

        let Some(price) = extract_price_or_range(&candidate.text) else {
            tracing::debug!("{}: no price detected, skipping {}", self.label(), link);
            report.rejected += 1;
            return;
        };

        let title = resolve_title(
            self.fetcher.as_ref(),
            candidate.title,
            &link,
            self.config.title_fetch_timeout,
        )
        .await;

        if !is_promotional(title.as_deref(), &candidate.text) {
            tracing::debug!("{}: not promotional, skipping {:?} {}", self.label(), title, link);
            report.rejected += 1;
            return;
        }

        if !self.config.filter.is_relevant(title.as_deref(), &candidate.text, &link) {
            tracing::debug!("{}: not a relevant product, skipping {:?} {}", self.label(), title, link);
            report.rejected += 1;
            return;
        }

        let offer = ScrapedOffer {
            source: self.source.shop.source_name().to_string(),
            title,
            url: link,
            price,
            shop: self.label().to_string(),
            image_url: candidate.image,
            coupon: detect_coupon(&candidate.text, self.config.scraper.loose_coupon_detection),
        };

        if self.offers.insert(&offer).await {
            report.inserted += 1;
            tracing::info!(
                "{} -> inserted: {} {} {}",
                self.label(),
                offer.title.as_deref().unwrap_or_default(),
                offer.price,
                offer.url
            );
        } else {
            report.duplicates += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::sources::default_sources;

    #[test]
    fn test_parse_listing_page_extracts_fields() {
        let kabum = default_sources().remove(0);
        let html = r#"<div class="grid">
            <article><a href="/produto/1" title="SSD NVMe 1TB"><img src="/img/1.jpg"></a>
              <span>R$ 399,00</span><span>R$ 299,00</span></article>
            <p>R$ 5,00 de frete</p>
        </div>"#;
        let candidates = parse_listing_page(html, "https://www.kabum.com.br/ofertas/ofertaskabum", &kabum);

        // both prices of the article land on it; the lone <p> climbs to the grid
        assert!(candidates.len() >= 2);
        assert_eq!(candidates[0].title.as_deref(), Some("SSD NVMe 1TB"));
        assert_eq!(candidates[0].link.as_deref(), Some("https://www.kabum.com.br/produto/1"));
        assert_eq!(candidates[0].image.as_deref(), Some("https://www.kabum.com.br/img/1.jpg"));
        assert_eq!(candidates[0].text, "R$ 399,00 R$ 299,00");
        assert_eq!(candidates[0], candidates[1]);
    }

    #[test]
    fn test_invalid_base_url_yields_nothing() {
        let kabum = default_sources().remove(0);
        assert!(parse_listing_page("<a href='/p'>R$ 1,00</a>", "not a url", &kabum).is_empty());
    }
}
