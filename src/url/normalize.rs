use crate::UrlError;
use url::{form_urlencoded, Url};

/// Tracking query parameters removed during normalization
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid"];

/// Normalizes a URL according to url2md's canonicalization rule
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only `http` and `https` (the scheme itself is kept as given)
/// 3. Lowercase the host (a `www.` prefix is kept)
/// 4. Normalize path:
///    - Remove dot segments and empty segments
///    - Remove trailing slash (except for root /)
///    - Empty path becomes /
/// 5. Remove fragment (everything after #)
/// 6. Remove tracking query parameters, keeping the order of the rest
/// 7. Remove empty query string (trailing ?)
///
/// # Examples
///
/// ```
/// use url2md::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.com/blog/post/#comments").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/blog/post");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Resolves `reference` against `base`, then normalizes the result
pub fn normalize_relative(base: &Url, reference: &str) -> Result<Url, UrlError> {
    let url = base
        .join(reference.trim())
        .map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    let host = url.host_str().ok_or(UrlError::MissingHost)?.to_lowercase();
    url.set_host(Some(&host))
        .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    url.set_fragment(None);

    if let Some(query) = url.query() {
        if let Some(kept) = strip_tracking_params(query) {
            url.set_query(if kept.is_empty() { None } else { Some(kept.as_str()) });
        }
    }

    Ok(url)
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", segments.join("/"))
}

/// Drops tracking parameters from a raw query string
///
/// Returns `None` when the query needs no change. Kept pairs are copied
/// byte for byte, so their encoding and order survive.
fn strip_tracking_params(query: &str) -> Option<String> {
    let pairs: Vec<&str> = query.split('&').collect();
    let kept: Vec<&str> = pairs
        .iter()
        .copied()
        .filter(|pair| !pair.is_empty() && !is_tracking_pair(pair))
        .collect();

    if kept.len() == pairs.len() {
        return None;
    }
    Some(kept.join("&"))
}

fn is_tracking_pair(pair: &str) -> bool {
    form_urlencoded::parse(pair.as_bytes())
        .next()
        .is_some_and(|(key, _)| is_tracking_param(&key))
}

fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
