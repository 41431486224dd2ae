//! Artifact path resolution
//!
//! Artifacts mirror the site layout: `<host>/<dirs...>/<base>.md`, where the
//! directories come from the URL path and the base name from the page title.

use crate::content::UNTITLED;
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use url::Url;

const MAX_FILENAME_CHARS: usize = 100;
const FALLBACK_NAME: &str = "index";

static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_:]+").unwrap());
static HYPHENS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());

/// Turns a title or path component into a safe file name
///
/// Never returns an empty string.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized = sanitize_or_empty(name);
    if sanitized.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        sanitized
    }
}

fn sanitize_or_empty(name: &str) -> String {
    let lowered = name.to_lowercase();
    let hyphenated = SEPARATOR_RE.replace_all(&lowered, "-");
    let kept: String = hyphenated
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect();
    let collapsed = HYPHENS_RE.replace_all(&kept, "-");

    collapsed
        .trim_matches('-')
        .chars()
        .take(MAX_FILENAME_CHARS)
        .collect::<String>()
        .trim_end_matches('-')
        .to_string()
}

/// Maps a source URL and its extracted title to a path under the output root
///
/// The base name is the first non-empty of: the sanitized title (unless it
/// is [`UNTITLED`]), the sanitized last path component without its
/// extension, `index`.
pub fn resolve_output_path(url: &Url, title: &str) -> PathBuf {
    let mut path = PathBuf::from(url.host_str().unwrap_or("unknown-host"));

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let (last, dirs) = match segments.split_last() {
        Some((last, dirs)) => (Some(*last), dirs),
        None => (None, &[][..]),
    };

    for dir in dirs.iter().filter(|d| **d != "." && **d != "..") {
        path.push(dir);
    }

    let from_title = (title != UNTITLED)
        .then(|| sanitize_or_empty(title))
        .filter(|name| !name.is_empty());
    let from_path = last
        .map(|component| sanitize_or_empty(strip_extension(component)))
        .filter(|name| !name.is_empty());
    let base = from_title
        .or(from_path)
        .unwrap_or_else(|| FALLBACK_NAME.to_string());

    path.push(format!("{}.md", base));
    path
}

fn strip_extension(component: &str) -> &str {
    match component.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => component,
    }
}
