use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, Duration};

use crate::config::DiscoveryConfig;
use crate::scrapers::fetcher::PageFetcher;
use crate::scrapers::retail::{RetailScraper, ScrapeReport};
use crate::services::offer_repository::OfferRepository;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub sources: usize,
    pub pages_fetched: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub rejected: usize,
}

impl CycleReport {
    fn add(&mut self, report: &ScrapeReport) {
        self.sources += 1;
        self.pages_fetched += report.pages_fetched;
        self.inserted += report.inserted;
        self.duplicates += report.duplicates;
        self.rejected += report.rejected;
    }
}

pub async fn run_discovery_loop(
    config: Arc<DiscoveryConfig>,
    fetcher: Arc<dyn PageFetcher>,
    offers: OfferRepository,
) {
    loop {
        tracing::info!("Collecting sources");
        run_discovery_cycle(config.clone(), fetcher.clone(), &offers).await;
        sleep(config.interval).await;
    }
}

/// One pass over every configured source, strictly one after another.
pub async fn run_discovery_cycle(
    config: Arc<DiscoveryConfig>,
    fetcher: Arc<dyn PageFetcher>,
    offers: &OfferRepository,
) -> CycleReport {
    let started = Instant::now();
    let mut cycle = CycleReport::default();

    for (i, source) in config.sources.iter().enumerate() {
        if i > 0 && config.source_pause > Duration::ZERO {
            sleep(config.source_pause).await;
        }

        let label = source.shop.label();
        let scraper = RetailScraper::new(source.clone(), config.clone(), fetcher.clone(), offers.clone());
        let report = scraper.scrape().await;

        tracing::info!(
            "{} complete: {} pages, {} inserted, {} already known, {} rejected",
            label,
            report.pages_fetched,
            report.inserted,
            report.duplicates,
            report.rejected
        );
        cycle.add(&report);
    }

    tracing::info!(
        "Discovery cycle finished in {:.1}s: {} new offers from {} sources",
        started.elapsed().as_secs_f64(),
        cycle.inserted,
        cycle.sources
    );

    cycle
}
