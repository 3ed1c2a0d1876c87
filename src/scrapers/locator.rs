//! Candidate block discovery on listing pages

use scraper::{ElementRef, Html};

use super::SourceConfig;
use super::extractor::{Block, find_link, is_usable_href};
use super::markup::{MarkupNode, elements_by_tag, elements_with_text_matching};
use super::parser::PRICE_REGEX;

/// How a source's listing markup ties prices to product links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateStrategy {
    /// Start at every price text and climb until an ancestor holds a link
    PriceNearLink,
    /// Start at every product link and climb until an ancestor shows a price
    LinkNearPrice,
}

/// Elements too broad to describe a single listing
fn is_page_level(tag: &str) -> bool {
    matches!(tag, "html" | "body" | "main")
}

/// Inspect `start` and up to `max_depth - 1` of its ancestors, returning the
/// first one accepted.
fn walk_up<N, F>(start: Option<N>, max_depth: usize, accept: F) -> Option<N>
where
    N: MarkupNode,
    F: Fn(&N) -> bool,
{
    let mut current = start;

    for _ in 0..max_depth {
        let node = current?;
        if is_page_level(node.tag()) {
            return None;
        }
        if accept(&node) {
            return Some(node);
        }
        current = node.parent_element();
    }

    None
}

/// Blocks anchored on price text nodes. `price_nodes` are the elements owning
/// the matched text. Several prices may land on the same block; dedup happens
/// later, by link.
pub fn blocks_from_prices<N, I>(price_nodes: I, max_depth: usize, link_markers: &[String]) -> Vec<Block<N>>
where
    N: MarkupNode,
    I: IntoIterator<Item = N>,
{
    price_nodes
        .into_iter()
        .filter_map(|start| {
            let node = walk_up(Some(start), max_depth, |n| find_link(*n, link_markers).is_some())?;
            Some(Block {
                node,
                link: find_link(node, link_markers),
            })
        })
        .collect()
}

/// Blocks anchored on product links whose href contains one of `link_markers`.
pub fn blocks_from_links<N, I>(anchors: I, max_depth: usize, link_markers: &[String]) -> Vec<Block<N>>
where
    N: MarkupNode,
    I: IntoIterator<Item = N>,
{
    anchors
        .into_iter()
        .filter(|a| {
            a.attr("href").is_some_and(|href| {
                is_usable_href(href)
                    && (link_markers.is_empty() || link_markers.iter().any(|m| href.contains(m.as_str())))
            })
        })
        .filter_map(|anchor| {
            let node = walk_up(anchor.parent_element(), max_depth, |n| {
                PRICE_REGEX.is_match(&n.flat_text().replace('\u{a0}', " "))
            })?;
            Some(Block {
                node,
                link: Some(anchor),
            })
        })
        .collect()
}

/// Locate candidate blocks in a parsed listing page using the source's strategy.
pub fn locate_blocks<'a>(document: &'a Html, source: &SourceConfig) -> Vec<Block<ElementRef<'a>>> {
    match source.strategy {
        LocateStrategy::PriceNearLink => {
            let prices = elements_with_text_matching(document, |text| {
                PRICE_REGEX.is_match(&text.replace('\u{a0}', " "))
            });
            blocks_from_prices(prices, source.max_depth, &source.link_markers)
        }
        LocateStrategy::LinkNearPrice => blocks_from_links(
            elements_by_tag(document, "a"),
            source.max_depth,
            &source.link_markers,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::Shop;

    fn source(strategy: LocateStrategy, markers: &[&str]) -> SourceConfig {
        SourceConfig {
            shop: Shop::Kabum,
            pages: vec![],
            strategy,
            max_depth: 4,
            link_markers: markers.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_price_walks_up_to_linked_ancestor() {
        let document = Html::parse_document(
            r#"<section>
                 <article class="card">
                   <a href="/produto/1">SSD 1TB</a>
                   <div><div><span>R$ 399,00</span></div></div>
                 </article>
               </section>"#,
        );
        let blocks = locate_blocks(&document, &source(LocateStrategy::PriceNearLink, &[]));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].node.tag(), "article");
        assert_eq!(blocks[0].link.as_ref().and_then(|a| a.attr("href")), Some("/produto/1"));
    }

    #[test]
    fn test_price_without_link_in_range_is_dropped() {
        let document = Html::parse_document(
            r#"<div><a href="/produto/1">SSD</a>
                 <div><div><div><div><span>R$ 399,00</span></div></div></div></div>
               </div>"#,
        );
        let blocks = locate_blocks(&document, &source(LocateStrategy::PriceNearLink, &[]));
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_price_inside_link_uses_the_link() {
        let document = Html::parse_document(
            r#"<ul><li><a href="/produto/9"><b>R$ 10,00</b></a></li></ul>"#,
        );
        let blocks = locate_blocks(&document, &source(LocateStrategy::PriceNearLink, &[]));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].node.tag(), "a");
    }

    #[test]
    fn test_link_near_price_strategy() {
        let document = Html::parse_document(
            r#"<div class="deal">
                 <a href="/Monitor-Gamer/dp/B0ABC"><img src="/m.jpg" alt="Monitor"></a>
                 <span>R$ 899,00</span>
               </div>
               <div class="nav"><a href="/gp/help">Ajuda</a><span>R$ 1,00</span></div>"#,
        );
        let blocks = locate_blocks(
            &document,
            &source(LocateStrategy::LinkNearPrice, &["/dp/", "/gp/product/"]),
        );
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].node.attr("class"), Some("deal"));
        assert_eq!(blocks[0].link.as_ref().and_then(|a| a.attr("href")), Some("/Monitor-Gamer/dp/B0ABC"));
    }
}
