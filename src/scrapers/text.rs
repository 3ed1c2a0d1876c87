//! Text canonicalization shared by every matcher in the pipeline

use scraper::Html;
use unicode_normalization::UnicodeNormalization;

/// Lower-case, strip accents and collapse whitespace.
///
/// Accents are removed by decomposing (NFKD) and dropping every non-ASCII
/// code point, so `"Placa de Vídeo"` becomes `"placa de video"`. Emoji and
/// other symbols vanish as well.
pub fn normalize_text(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfkd()
        .filter(|c| c.is_ascii())
        .collect();

    collapse_whitespace(&folded)
}

/// Unescape entities, replace NBSP and collapse whitespace.
/// Returns `None` when nothing but whitespace is left.
pub fn clean_text(text: &str) -> Option<String> {
    let unescaped = unescape_entities(text);
    let cleaned = collapse_whitespace(&unescaped.replace('\u{a0}', " "));

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode HTML entities left in already-extracted text (`&amp;`, `&#233;`).
/// Attribute values and text nodes coming from `scraper` are decoded once by
/// the parser; this catches double-escaped titles and raw database values.
pub fn unescape_entities(text: &str) -> String {
    if !(text.contains('&') && text.contains(';')) {
        return text.to_string();
    }

    let fragment = Html::parse_fragment(text);
    let decoded: String = fragment.root_element().text().collect();

    if decoded.trim().is_empty() {
        text.to_string()
    } else {
        decoded
    }
}

/// True if `term` occurs in `haystack` starting at a word boundary.
///
/// Both sides are expected to be normalized already. Only the start of the
/// term is anchored, so `"televis"` matches `"televisao"` while `"ram"` does
/// not match `"programa"`.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }

    haystack.match_indices(term).any(|(idx, _)| {
        idx == 0
            || haystack[..idx]
                .chars()
                .next_back()
                .is_some_and(|c| !c.is_alphanumeric())
            || !term.starts_with(|c: char| c.is_alphanumeric())
    })
}
