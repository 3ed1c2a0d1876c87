//! Replacement of banner-like titles with the product page's own title

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};
use std::time::Duration;

use super::fetcher::PageFetcher;
use super::text::{clean_text, normalize_text};

/// Normalized titles shorter than this are treated as labels, not names
pub const MIN_TITLE_LEN: usize = 8;

lazy_static! {
    static ref GENERIC_TITLE_REGEX: Regex = Regex::new(
        r"\b(oferta|ofertas|promocao|promo|black friday|flash sale)\b"
    ).unwrap();

    // Ordered: social preview, meta title, h1, <title>, h2/h3
    static ref TITLE_SELECTORS: Vec<Selector> = [
        r#"meta[property="og:title"]"#,
        r#"meta[name="title"]"#,
        "h1",
        "title",
        "h2, h3",
    ]
    .iter()
    .map(|s| Selector::parse(s).unwrap())
    .collect();
}

/// Absent, too short, or made of promo vocabulary
pub fn looks_like_generic_title(title: Option<&str>) -> bool {
    let Some(title) = title else {
        return true;
    };

    let plain = normalize_text(title);
    plain.chars().count() < MIN_TITLE_LEN || GENERIC_TITLE_REGEX.is_match(&plain)
}

/// Best title a product page offers about itself
pub fn title_from_document(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    TITLE_SELECTORS.iter().find_map(|selector| {
        let element = document.select(selector).next()?;
        match element.value().name() {
            "meta" => element.value().attr("content").and_then(clean_text),
            _ => clean_text(&element.text().collect::<Vec<_>>().join(" ")),
        }
    })
}

/// Keep `title` unless it looks generic; then try the linked page.
/// Any failure keeps the original title.
pub async fn resolve_title(
    fetcher: &dyn PageFetcher,
    title: Option<String>,
    link: &str,
    timeout: Duration,
) -> Option<String> {
    if !looks_like_generic_title(title.as_deref()) {
        return title;
    }

    let Some(html) = fetcher.fetch(link, timeout).await else {
        tracing::debug!("Could not fetch {} to resolve generic title {:?}", link, title);
        return title;
    };

    match title_from_document(&html) {
        Some(real_title) => {
            tracing::info!("Generic title {:?} replaced -> {}", title, real_title);
            Some(real_title)
        }
        None => {
            tracing::debug!("No title found on {}, keeping {:?}", link, title);
            title
        }
    }
}
