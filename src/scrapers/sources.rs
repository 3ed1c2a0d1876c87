use super::locator::LocateStrategy;
use super::{Shop, SourceConfig};

/// Listing pages scraped on every discovery cycle, in order.
pub fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig {
            shop: Shop::Kabum,
            pages: vec![
                "https://www.kabum.com.br/ofertas/ofertaskabum".to_string(),
                "https://www.kabum.com.br/lojas/ofertas-do-dia".to_string(),
                "https://www.kabum.com.br/promocao/OFERTAFLASH".to_string(),
            ],
            strategy: LocateStrategy::PriceNearLink,
            max_depth: 4,
            link_markers: vec![],
        },
        SourceConfig {
            shop: Shop::Pichau,
            pages: vec![
                "https://www.pichau.com.br/promocao/".to_string(),
                "https://www.pichau.com.br/ofertas/".to_string(),
                "https://www.pichau.com.br/".to_string(),
            ],
            strategy: LocateStrategy::PriceNearLink,
            max_depth: 4,
            link_markers: vec![],
        },
        SourceConfig {
            shop: Shop::Amazon,
            pages: vec![
                "https://www.amazon.com.br/deals".to_string(),
                "https://www.amazon.com.br/gp/goldbox".to_string(),
            ],
            strategy: LocateStrategy::LinkNearPrice,
            max_depth: 4,
            link_markers: vec!["/dp/".to_string(), "/gp/product/".to_string()],
        },
    ]
}
