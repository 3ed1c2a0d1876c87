//! Minimal typed view over a parsed page.
//!
//! The locator and extractor only talk to [`MarkupNode`], so the concrete HTML
//! library stays behind this module. `scraper` is the implementation in use.

use scraper::{ElementRef, Html};

pub trait MarkupNode: Copy {
    fn tag(&self) -> &str;

    fn attr(&self, name: &str) -> Option<&str>;

    /// Closest ancestor element, if any
    fn parent_element(&self) -> Option<Self>;

    /// Descendant elements (excluding `self`) whose tag is one of `tags`,
    /// in document order
    fn descendants_by_tag(&self, tags: &[&str]) -> Vec<Self>;

    /// Text content, one entry per non-blank text node, trimmed
    fn text_lines(&self) -> Vec<String>;

    /// Text content flattened onto a single line
    fn flat_text(&self) -> String {
        self.text_lines().join(" ")
    }

    fn first_descendant(&self, tags: &[&str]) -> Option<Self> {
        self.descendants_by_tag(tags).into_iter().next()
    }
}

impl<'a> MarkupNode for ElementRef<'a> {
    fn tag(&self) -> &str {
        self.value().name()
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn parent_element(&self) -> Option<Self> {
        self.parent().and_then(ElementRef::wrap)
    }

    fn descendants_by_tag(&self, tags: &[&str]) -> Vec<Self> {
        self.descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .filter(|el| tags.contains(&el.value().name()))
            .collect()
    }

    fn text_lines(&self) -> Vec<String> {
        self.text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Elements that directly own a text node for which `matches` returns true.
/// Script and style bodies are never considered.
pub fn elements_with_text_matching<'a, F>(document: &'a Html, matches: F) -> Vec<ElementRef<'a>>
where
    F: Fn(&str) -> bool,
{
    document
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text: &str = node.value().as_text()?;
            if !matches(text) {
                return None;
            }
            let parent = node.parent().and_then(ElementRef::wrap)?;
            match parent.value().name() {
                "script" | "style" | "noscript" => None,
                _ => Some(parent),
            }
        })
        .collect()
}

/// All elements in the document with the given tag
pub fn elements_by_tag<'a>(document: &'a Html, tag: &str) -> Vec<ElementRef<'a>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == tag)
        .collect()
}
