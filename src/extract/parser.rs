//! HTML parser for extracting checkable references
//!
//! Collects, in document order:
//! - `<a href>` anchors
//! - `<img src>` images
//! - `<link rel="stylesheet" href>` stylesheets
//! - `<script src>` scripts

use crate::state::{LinkDescriptor, TagKind};
use scraper::{ElementRef, Html, Selector};
use std::collections::{HashMap, HashSet};
use url::Url;

const REFERENCE_SELECTOR: &str = "a[href], img[src], link[rel~=stylesheet][href], script[src]";

/// Parses HTML content and extracts every checkable reference
///
/// # Extraction Rules
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links (same page anchors)
/// - Anything that is not HTTP(S) after resolution
///
/// Fragments are stripped, and a URL seen twice is kept only at its first
/// occurrence. Identifiers are `{kind}-{n}`, numbered per kind.
///
/// # Example
///
/// ```no_run
/// use ripple_check::extract::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &base_url);
/// assert_eq!(links[0].url, "https://example.com/page");
/// assert_eq!(links[0].id, "a-0");
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<LinkDescriptor> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse(REFERENCE_SELECTOR) {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    let mut seen = HashSet::new();
    let mut counters: HashMap<TagKind, usize> = HashMap::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(kind) = TagKind::from_tag(element.value().name()) else {
            continue;
        };
        let attr = if kind == TagKind::Image || kind == TagKind::Script {
            "src"
        } else {
            "href"
        };
        let resolved = element
            .value()
            .attr(attr)
            .and_then(|raw| resolve_link(raw, base_url));
        let Some(url) = resolved else {
            continue;
        };
        if !seen.insert(url.clone()) {
            continue;
        }

        let index = counters.entry(kind).or_insert(0);
        let id = format!("{}-{}", kind, index);
        *index += 1;

        links.push(LinkDescriptor::new(url, kind, display_text(&element, kind), id));
    }

    links
}

/// Anchor text, else the `alt`/`title` attribute; blank counts as absent
fn display_text(element: &ElementRef<'_>, kind: TagKind) -> Option<String> {
    let text = if kind == TagKind::Anchor {
        let collected = element.text().collect::<Vec<_>>().join(" ");
        normalize_whitespace(&collected)
    } else {
        String::new()
    };
    if !text.is_empty() {
        return Some(text);
    }

    ["alt", "title"]
        .iter()
        .filter_map(|name| element.value().attr(name))
        .map(normalize_whitespace)
        .find(|s| !s.is_empty())
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolves a reference to an absolute URL without its fragment
///
/// Returns None if the reference should be excluded.
fn resolve_link(raw: &str, base_url: &Url) -> Option<String> {
    let raw = raw.trim();

    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }

    let lower = raw.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let mut absolute = base_url.join(raw).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    absolute.set_fragment(None);
    Some(absolute.to_string())
}
