use url::Url;

/// Boundary that every URL entering the frontier must fall under
///
/// A scope is a host plus a base path. A URL is inside the scope when its
/// host matches and its path is the base path or lies below it on a segment
/// boundary, so `/blog` accepts `/blog/post` but not `/blogroll`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    host: Option<String>,
    base_path: String,
}

impl Scope {
    /// Scope derived from a crawl seed: the seed's host and normalized path
    ///
    /// The seed is expected to be normalized already (see [`normalize_url`]).
    ///
    /// [`normalize_url`]: crate::url::normalize_url
    pub fn from_seed(seed: &Url) -> Self {
        Self {
            host: seed.host_str().map(str::to_lowercase),
            base_path: seed.path().trim_end_matches('/').to_string(),
        }
    }

    /// Scope that accepts every http(s) URL
    ///
    /// Used for URL lists and sitemaps, where the input is already explicit.
    pub fn any() -> Self {
        Self {
            host: None,
            base_path: String::new(),
        }
    }

    /// The base path prefix, `/` for a root scope
    pub fn base_path(&self) -> &str {
        if self.base_path.is_empty() {
            "/"
        } else {
            &self.base_path
        }
    }

    /// Returns true if the (normalized) URL lies inside this scope
    pub fn contains(&self, url: &Url) -> bool {
        if let Some(host) = &self.host {
            match url.host_str() {
                Some(candidate) if candidate.eq_ignore_ascii_case(host) => {}
                _ => return false,
            }
        }

        if self.base_path.is_empty() {
            return true;
        }

        let path = url.path();
        match path.strip_prefix(self.base_path.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}
