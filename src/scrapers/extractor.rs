//! Title / link / image recovery from a single candidate block

use url::Url;

use super::markup::MarkupNode;
use super::text::{clean_text, normalize_text};

/// Navigation texts that are never product titles, stored normalized
const DENIED_TITLES: &[&str] = &[
    "ir para o conteudo principal",
    "ir para o conteudo",
    "pular para o conteudo",
    "skip to main content",
    "skip to content",
];

/// A markup fragment believed to hold exactly one offer, plus the anchor the
/// offer links to when the locator already knows it.
#[derive(Debug, Clone, Copy)]
pub struct Block<N> {
    pub node: N,
    pub link: Option<N>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub title: Option<String>,
    pub link: Option<String>,
    pub image: Option<String>,
}

/// An href that points somewhere other than the current page
pub fn is_usable_href(href: &str) -> bool {
    let href = href.trim();
    let lower = href.to_lowercase();

    !href.is_empty()
        && !href.starts_with('#')
        && !lower.ends_with("#main-content")
        && !lower.starts_with("javascript:")
        && !lower.starts_with("mailto:")
}

fn matches_markers(href: &str, markers: &[String]) -> bool {
    markers.is_empty() || markers.iter().any(|m| href.contains(m.as_str()))
}

fn is_link<N: MarkupNode>(node: &N, markers: &[String]) -> bool {
    node.tag() == "a"
        && node
            .attr("href")
            .is_some_and(|href| is_usable_href(href) && matches_markers(href, markers))
}

/// First outbound anchor of the block: the block itself if it is one,
/// otherwise its first qualifying descendant.
pub fn find_link<N: MarkupNode>(node: N, markers: &[String]) -> Option<N> {
    if is_link(&node, markers) {
        return Some(node);
    }

    node.descendants_by_tag(&["a"])
        .into_iter()
        .find(|a| is_link(a, markers))
}

/// Resolve `href` against `base`, keeping only http(s) results
pub fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let resolved = base.join(href.trim()).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}

fn is_denied_title(title: &str) -> bool {
    let plain = normalize_text(title);
    DENIED_TITLES.iter().any(|denied| plain == *denied)
}

fn accept_title(raw: Option<&str>) -> Option<String> {
    raw.and_then(clean_text).filter(|t| !is_denied_title(t))
}

fn first_attr<N: MarkupNode>(node: &N, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| accept_title(node.attr(name)))
}

fn image_source<N: MarkupNode>(img: &N) -> Option<&str> {
    let src = img
        .attr("src")
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.starts_with("data:"));

    src.or_else(|| img.attr("data-src").map(str::trim).filter(|s| !s.is_empty()))
}

/// Recover title, link and image with an ordered fallback chain:
/// link attributes and text, image alt inside the link, block attributes,
/// first heading, first text line of the block.
pub fn extract_fields<N: MarkupNode>(block: &Block<N>, base: &Url) -> ExtractedFields {
    let anchor = block.link;
    let anchor_img = anchor.and_then(|a| a.first_descendant(&["img"]));

    let title = anchor
        .and_then(|a| {
            first_attr(&a, &["title", "aria-label", "data-title"])
                .or_else(|| accept_title(Some(a.flat_text().as_str())))
        })
        .or_else(|| anchor_img.and_then(|img| accept_title(img.attr("alt"))))
        .or_else(|| first_attr(&block.node, &["data-title", "data-name", "aria-label", "title"]))
        .or_else(|| {
            block
                .node
                .first_descendant(&["h2", "h3", "h4"])
                .and_then(|h| accept_title(Some(h.flat_text().as_str())))
        })
        .or_else(|| {
            block
                .node
                .text_lines()
                .first()
                .and_then(|line| accept_title(Some(line.as_str())))
        });

    let link = anchor
        .as_ref()
        .and_then(|a| a.attr("href"))
        .and_then(|href| resolve_url(base, href));

    let image = anchor_img
        .as_ref()
        .and_then(image_source)
        .and_then(|src| resolve_url(base, src));

    ExtractedFields { title, link, image }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::markup::elements_by_tag;
    use scraper::Html;

    fn base() -> Url {
        Url::parse("https://www.kabum.com.br/ofertas/ofertaskabum").unwrap()
    }

    fn extract_first_div(html: &str) -> ExtractedFields {
        let document = Html::parse_document(html);
        let node = elements_by_tag(&document, "div")[0];
        let block = Block { node, link: find_link(node, &[]) };
        extract_fields(&block, &base())
    }

    #[test]
    fn test_link_attributes_win() {
        let fields = extract_first_div(
            r#"<div><a href="/produto/1" title="SSD Kingston 1TB"><img src="/img/1.jpg" alt="alt text"></a>
               <h3>Heading</h3></div>"#,
        );
        assert_eq!(fields.title.as_deref(), Some("SSD Kingston 1TB"));
        assert_eq!(fields.link.as_deref(), Some("https://www.kabum.com.br/produto/1"));
        assert_eq!(fields.image.as_deref(), Some("https://www.kabum.com.br/img/1.jpg"));
    }

    #[test]
    fn test_image_alt_then_heading_fallbacks() {
        let fields = extract_first_div(
            r#"<div><a href="/p/2"><img src="data:image/gif;base64,AAA" data-src="https://cdn.x/2.webp" alt="Mouse Gamer"></a></div>"#,
        );
        assert_eq!(fields.title.as_deref(), Some("Mouse Gamer"));
        assert_eq!(fields.image.as_deref(), Some("https://cdn.x/2.webp"));

        let fields = extract_first_div(
            r#"<div><a href="/p/3"><img src="/i.png"></a><h4> Teclado&nbsp;Mecânico </h4></div>"#,
        );
        assert_eq!(fields.title.as_deref(), Some("Teclado Mecânico"));
    }

    #[test]
    fn test_block_attributes_and_first_line() {
        let fields = extract_first_div(
            r#"<div data-name="Fonte 650W"><a href="/p/4"></a></div>"#,
        );
        assert_eq!(fields.title.as_deref(), Some("Fonte 650W"));

        let fields = extract_first_div(
            r#"<div><span>Cooler Box</span><span>R$ 50,00</span><a href="/p/5"> </a></div>"#,
        );
        assert_eq!(fields.title.as_deref(), Some("Cooler Box"));
    }

    #[test]
    fn test_skip_links_are_not_titles() {
        let fields = extract_first_div(
            r##"<div><a href="#main">Ir para o conteúdo principal</a><a href="/p/6">Ir para o conteúdo principal</a><h2>Monitor 27</h2></div>"##,
        );
        assert_eq!(fields.title.as_deref(), Some("Monitor 27"));
        assert_eq!(fields.link.as_deref(), Some("https://www.kabum.com.br/p/6"));
    }

    #[test]
    fn test_missing_link() {
        let fields = extract_first_div(r##"<div><a href="#top">Topo</a><p>R$ 10,00</p></div>"##);
        assert_eq!(fields.link, None);
        assert_eq!(fields.image, None);
    }

    #[test]
    fn test_usable_href() {
        assert!(is_usable_href("/produto/1"));
        assert!(is_usable_href("https://x.com/a#frag"));
        assert!(!is_usable_href("  "));
        assert!(!is_usable_href("#"));
        assert!(!is_usable_href("/page#main-content"));
        assert!(!is_usable_href("javascript:void(0)"));
    }
}
