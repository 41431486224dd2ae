//! Title extraction fallback chain

use scraper::{Html, Selector};

/// Title used when no step of the chain yields one
pub const UNTITLED: &str = "untitled";

type TitleStep = fn(&Html) -> Option<String>;

/// Ordered title sources; the first non-empty result wins
const TITLE_CHAIN: &[TitleStep] = &[title_element, og_title, first_heading];

/// Extracts the page title
///
/// Tries, in order: the `<title>` element, the `og:title` meta value, the
/// first `<h1>` text, and finally the literal [`UNTITLED`].
pub fn extract_title(document: &Html) -> String {
    TITLE_CHAIN
        .iter()
        .find_map(|step| step(document))
        .unwrap_or_else(|| UNTITLED.to_string())
}

fn title_element(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let element = document.select(&selector).next()?;
    clean_text(&element.text().collect::<String>())
}

fn og_title(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"meta[property="og:title"]"#).ok()?;
    document
        .select(&selector)
        .filter_map(|element| element.value().attr("content"))
        .find_map(clean_text)
}

fn first_heading(document: &Html) -> Option<String> {
    let selector = Selector::parse("h1").ok()?;
    let element = document.select(&selector).next()?;
    clean_text(&element.text().collect::<String>())
}

/// Collapses whitespace runs; `None` when nothing is left
fn clean_text(raw: &str) -> Option<String> {
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
