//! Sitemap resolution
//!
//! Reads `sitemap.xml` documents with `quick-xml`. Both plain `<urlset>`
//! sitemaps and `<sitemapindex>` documents are understood; an index is
//! expanded depth-first, keeping document order, down to
//! [`MAX_SITEMAP_NESTING`] levels.

use crate::crawler::Fetcher;
use crate::{ParseError, Url2mdError};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Deepest sitemap index nesting followed below the root sitemap
pub const MAX_SITEMAP_NESTING: usize = 3;

/// Parsed content of one sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// A `<urlset>`: page locations in document order
    UrlSet(Vec<String>),

    /// A `<sitemapindex>`: locations of further sitemaps
    Index(Vec<String>),
}

/// Fetches a sitemap and returns its page URLs in sitemap order
///
/// When `filter_path` is set, only URLs whose path starts with that literal
/// prefix are kept. Any fetch or parse failure, including one in a nested
/// sitemap, fails the whole resolution: a partial list is never returned.
pub async fn resolve_sitemap(
    fetcher: &dyn Fetcher,
    sitemap_url: &Url,
    filter_path: Option<&str>,
    timeout: Duration,
) -> Result<Vec<Url>, Url2mdError> {
    tracing::info!("Parsing sitemap: {}", sitemap_url);

    let mut pending = vec![(sitemap_url.clone(), 0usize)];
    let mut fetched = HashSet::new();
    let mut urls = Vec::new();

    while let Some((current, level)) = pending.pop() {
        if !fetched.insert(current.as_str().to_string()) {
            continue;
        }

        let body = fetcher.fetch(&current, timeout).await?;

        match parse_sitemap(&body, &current)? {
            SitemapDocument::UrlSet(locations) => {
                tracing::debug!("{} URLs listed in {}", locations.len(), current);
                for location in locations {
                    match Url::parse(&location) {
                        Ok(url) if matches_filter(&url, filter_path) => urls.push(url),
                        Ok(_) => {}
                        Err(e) => tracing::warn!("Skipping sitemap entry '{}': {}", location, e),
                    }
                }
            }
            SitemapDocument::Index(locations) => {
                if level >= MAX_SITEMAP_NESTING {
                    tracing::warn!(
                        "Sitemap index {} nested deeper than {} levels, ignored",
                        current,
                        MAX_SITEMAP_NESTING
                    );
                    continue;
                }
                tracing::info!("Sitemap index detected ({} sitemaps)", locations.len());
                // Reversed so the stack pops them in document order
                for location in locations.into_iter().rev() {
                    match Url::parse(&location) {
                        Ok(url) => pending.push((url, level + 1)),
                        Err(e) => tracing::warn!("Skipping sitemap '{}': {}", location, e),
                    }
                }
            }
        }
    }

    if let Some(prefix) = filter_path {
        tracing::info!("{} URLs match the filter '{}'", urls.len(), prefix);
    }

    Ok(urls)
}

/// Parses one sitemap document
///
/// Tag names are matched on their local name, so namespace prefixes are
/// accepted. Syntax errors, unbalanced tags and unknown root elements are
/// reported as [`ParseError::MalformedSitemap`].
pub fn parse_sitemap(xml: &str, source: &Url) -> Result<SitemapDocument, ParseError> {
    let malformed = |message: String| ParseError::MalformedSitemap {
        url: source.to_string(),
        message,
    };

    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut is_index: Option<bool> = None;
    let mut current_loc: Option<String> = None;
    let mut locations = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.local_name().as_ref().to_vec();
                if open.is_empty() {
                    is_index = match name.as_slice() {
                        b"urlset" => Some(false),
                        b"sitemapindex" => Some(true),
                        other => {
                            return Err(malformed(format!(
                                "unexpected root element <{}>",
                                String::from_utf8_lossy(other)
                            )))
                        }
                    };
                }
                if name == b"loc" {
                    current_loc = Some(String::new());
                }
                open.push(name);
            }
            Ok(Event::Text(e)) => {
                if let Some(loc) = current_loc.as_mut() {
                    let text = e.unescape().map_err(|e| malformed(e.to_string()))?;
                    loc.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(loc) = current_loc.as_mut() {
                    loc.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(e)) => {
                open.pop();
                if e.local_name().as_ref() == b"loc" {
                    let parent_ok = matches!(
                        open.last().map(Vec::as_slice),
                        Some(b"url") | Some(b"sitemap")
                    );
                    if let Some(loc) = current_loc.take() {
                        let loc = loc.trim();
                        if parent_ok && !loc.is_empty() {
                            locations.push(loc.to_string());
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(malformed(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if !open.is_empty() {
        return Err(malformed("unexpected end of document".to_string()));
    }

    match is_index {
        Some(true) => Ok(SitemapDocument::Index(locations)),
        Some(false) => Ok(SitemapDocument::UrlSet(locations)),
        None => Err(malformed(
            "expected a <urlset> or <sitemapindex> element".to_string(),
        )),
    }
}

fn matches_filter(url: &Url, filter_path: Option<&str>) -> bool {
    filter_path.map_or(true, |prefix| url.path().starts_with(prefix))
}
