//! Structural cleanup of page chrome
//!
//! Elements are matched by tag name, by class/id fragments and, for anchors,
//! by skip-link targets. Matching subtrees are detached from the document
//! tree, which makes a second pass over the same document a no-op.

use crate::config::CleanupConfig;
use crate::ConfigError;
use ego_tree::NodeId;
use regex::{Regex, RegexBuilder};
use scraper::{ElementRef, Html, Selector};

const PROTECTED_TAGS: &[&str] = &["html", "head", "body"];

/// What a cleanup pass did to a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupOutcome {
    /// Number of subtrees detached
    pub removed: usize,

    /// True if the pass would have emptied the body and was undone
    pub restored: bool,
}

/// Removes boilerplate elements from parsed documents
#[derive(Debug, Clone)]
pub struct Cleaner {
    tags: Vec<String>,
    class_patterns: Vec<String>,
    skip_link: Regex,
}

impl Cleaner {
    /// Builds a cleaner from the configured denylists
    pub fn new(config: &CleanupConfig) -> Result<Self, ConfigError> {
        let skip_link = RegexBuilder::new(&config.skip_link_pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ConfigError::InvalidPattern {
                pattern: config.skip_link_pattern.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            tags: config
                .remove_tags
                .iter()
                .map(|t| t.to_ascii_lowercase())
                .filter(|t| !PROTECTED_TAGS.contains(&t.as_str()))
                .collect(),
            class_patterns: config
                .remove_class_patterns
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            skip_link,
        })
    }

    /// Detaches every boilerplate element from `document`
    ///
    /// If the result has no text or image left in the body while the
    /// original had some, the document is put back unmodified.
    pub fn clean(&self, document: &mut Html) -> CleanupOutcome {
        let doomed: Vec<NodeId> = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|element| self.is_boilerplate(*element))
            .map(|element| element.id())
            .collect();

        if doomed.is_empty() {
            return CleanupOutcome {
                removed: 0,
                restored: false,
            };
        }

        let original = document.clone();
        for id in &doomed {
            if let Some(mut node) = document.tree.get_mut(*id) {
                node.detach();
            }
        }

        if !has_body_content(document) && has_body_content(&original) {
            tracing::warn!(
                "Cleanup would remove the whole body ({} elements), keeping the original",
                doomed.len()
            );
            *document = original;
            return CleanupOutcome {
                removed: 0,
                restored: true,
            };
        }

        CleanupOutcome {
            removed: doomed.len(),
            restored: false,
        }
    }

    fn is_boilerplate(&self, element: ElementRef) -> bool {
        let value = element.value();
        let name = value.name();

        if PROTECTED_TAGS.contains(&name) {
            return false;
        }

        if self.tags.iter().any(|tag| tag == name) {
            return true;
        }

        if name == "a" {
            if let Some(href) = value.attr("href") {
                if self.skip_link.is_match(href) {
                    return true;
                }
            }
        }

        let id_matches = value.id().is_some_and(|id| self.matches_pattern(id));
        id_matches || value.classes().any(|class| self.matches_pattern(class))
    }

    fn matches_pattern(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        self.class_patterns
            .iter()
            .any(|pattern| token.contains(pattern.as_str()))
    }
}

/// True if the body holds any visible text or an image
fn has_body_content(document: &Html) -> bool {
    let Ok(body_selector) = Selector::parse("body") else {
        return false;
    };
    let Some(body) = document.select(&body_selector).next() else {
        return false;
    };

    if body.text().any(|t| !t.trim().is_empty()) {
        return true;
    }

    Selector::parse("img")
        .map(|img| body.select(&img).next().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaner() -> Cleaner {
        Cleaner::new(&CleanupConfig::default()).unwrap()
    }

    fn body_html(document: &Html) -> String {
        let selector = Selector::parse("body").unwrap();
        document.select(&selector).next().unwrap().inner_html()
    }

    #[test]
    fn test_removes_tags() {
        let mut doc = Html::parse_document(
            r#"<html><body>
                <nav><a href="/">Home</a></nav>
                <header>Site</header>
                <script>var x = 1;</script>
                <article><p>Content</p><button>Like</button></article>
                <footer>Copyright</footer>
            </body></html>"#,
        );
        let outcome = cleaner().clean(&mut doc);
        let body = body_html(&doc);

        assert_eq!(outcome.removed, 5);
        assert!(!outcome.restored);
        assert!(body.contains("<p>Content</p>"));
        for gone in ["<nav>", "<header>", "<script>", "<button>", "<footer>"] {
            assert!(!body.contains(gone), "{} still present", gone);
        }
    }

    #[test]
    fn test_removes_by_class_and_id() {
        let mut doc = Html::parse_document(
            r#"<html><body>
                <div class="Cookie-Banner">Accept cookies</div>
                <div id="sidebar-left">Links</div>
                <div class="post ad-slot">Buy now</div>
                <div class="post-content"><p>Keep me</p></div>
            </body></html>"#,
        );
        cleaner().clean(&mut doc);
        let body = body_html(&doc);

        assert!(body.contains("Keep me"));
        assert!(!body.contains("Accept cookies"));
        assert!(!body.contains("Links"));
        assert!(!body.contains("Buy now"));
    }

    #[test]
    fn test_removes_skip_links() {
        let mut doc = Html::parse_document(
            r##"<html><body>
                <a href="#main">Skip to content</a>
                <a href="#back-to-top">Top</a>
                <p>Text with <a href="/page">a link</a></p>
            </body></html>"##,
        );
        cleaner().clean(&mut doc);
        let body = body_html(&doc);

        assert!(!body.contains("Skip to content"));
        assert!(!body.contains("Top</a>"));
        assert!(body.contains(r#"<a href="/page">a link</a>"#));
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let mut doc = Html::parse_document(
            r#"<html><body><nav>Menu</nav><main><p>Body</p></main><aside>More</aside></body></html>"#,
        );
        let cleaner = cleaner();
        cleaner.clean(&mut doc);
        let once = doc.root_element().html();

        let second = cleaner.clean(&mut doc);
        assert_eq!(second.removed, 0);
        assert_eq!(doc.root_element().html(), once);
    }

    #[test]
    fn test_restores_when_everything_would_go() {
        let html = r#"<html><body><div class="page-header"><h1>Only content</h1><p>Text</p></div></body></html>"#;
        let mut doc = Html::parse_document(html);
        let before = doc.root_element().html();

        let outcome = cleaner().clean(&mut doc);

        assert!(outcome.restored);
        assert_eq!(outcome.removed, 0);
        assert_eq!(doc.root_element().html(), before);
    }

    #[test]
    fn test_empty_body_is_left_alone() {
        let mut doc = Html::parse_document("<html><body><nav></nav></body></html>");
        let outcome = cleaner().clean(&mut doc);
        assert!(!outcome.restored);
        assert_eq!(outcome.removed, 1);
    }

    #[test]
    fn test_body_is_never_removed() {
        let config = CleanupConfig {
            remove_tags: vec!["body".to_string()],
            remove_class_patterns: vec!["page".to_string()],
            ..CleanupConfig::default()
        };
        let cleaner = Cleaner::new(&config).unwrap();
        let mut doc = Html::parse_document(r#"<html><body class="page"><p>Text</p></body></html>"#);
        cleaner.clean(&mut doc);
        assert!(body_html(&doc).contains("<p>Text</p>"));
    }
}
