//! HTML parsing and link extraction
//!
//! This module turns fetched markup into a `scraper` document and collects
//! the hyperlinks a page points to.

use crate::url::normalize_relative;
use crate::ParseError;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Parses raw markup into a document tree
///
/// The HTML parser itself recovers from any markup error, so the only input
/// rejected here is a blank document.
///
/// # Example
///
/// ```
/// use url2md::crawler::parse_page;
///
/// let doc = parse_page("<html><body><p>Hi</p></body></html>").unwrap();
/// assert!(doc.root_element().html().contains("<p>Hi</p>"));
/// assert!(parse_page("   ").is_err());
/// ```
pub fn parse_page(raw: &str) -> Result<Html, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::EmptyDocument);
    }
    Ok(Html::parse_document(raw))
}

/// Extracts all followable links from a document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only references (same page anchors)
/// - Anything that is not http(s) after resolution
///
/// Links are resolved against `base_url`, normalized (so `/a/` and
/// `/a#part` both become `/a`) and deduplicated. Scope and depth filtering
/// belong to the frontier.
pub fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            if let Some(absolute_url) = resolve_link(href, base_url) {
                if seen.insert(absolute_url.as_str().to_string()) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    normalize_relative(base_url, href).ok()
}
