//! Relative → absolute reference rewriting
//!
//! Reference attributes are resolved against the page URL directly in the
//! cleaned tree, then the body is serialized with scraper. The rendered
//! Markdown keeps working links and images once it leaves the site it came
//! from.

use ego_tree::NodeId;
use scraper::node::Node;
use scraper::{Html, Selector};
use url::Url;

/// Rewrites references in place and serializes the document body
///
/// When the document has no `<body>`, the root element is serialized.
pub fn absolutize_html(document: &mut Html, base: &Url) -> String {
    let rewritten = absolutize_references(document, base);
    tracing::trace!("{} references resolved against {}", rewritten, base);

    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next());

    match body {
        Some(body) => body.html(),
        None => document.root_element().html(),
    }
}

/// Resolves reference attributes of every element still attached to the tree
///
/// Rewritten attributes: `href` (a, area, link), `src` (img, source, video,
/// audio, track, embed, iframe), `poster` (video) and `srcset` (img,
/// source). Fragment-only, `mailto:`, `tel:`, `javascript:` and `data:`
/// values are left as they are. Returns the number of attributes changed.
pub fn absolutize_references(document: &mut Html, base: &Url) -> usize {
    let ids: Vec<NodeId> = document
        .root_element()
        .descendants()
        .filter(|node| node.value().is_element())
        .map(|node| node.id())
        .collect();

    let mut rewritten = 0;
    for id in ids {
        let Some(mut node) = document.tree.get_mut(id) else {
            continue;
        };
        let Node::Element(element) = node.value() else {
            continue;
        };

        let tag = element.name().to_owned();
        for (name, value) in element.attrs.iter_mut() {
            let Some(resolved) = rewrite_attribute(&tag, &name.local, value, base) else {
                continue;
            };
            if resolved.as_str() != &**value {
                *value = resolved.as_str().into();
                rewritten += 1;
            }
        }
    }

    rewritten
}

/// New value for a reference attribute, `None` for any other attribute
fn rewrite_attribute(element: &str, attr: &str, value: &str, base: &Url) -> Option<String> {
    let rewritable = match attr {
        "href" => matches!(element, "a" | "area" | "link"),
        "src" => matches!(
            element,
            "img" | "source" | "video" | "audio" | "track" | "embed" | "iframe"
        ),
        "poster" => element == "video",
        "srcset" => matches!(element, "img" | "source"),
        _ => false,
    };

    if !rewritable {
        None
    } else if attr == "srcset" {
        Some(rewrite_srcset(value, base))
    } else {
        Some(resolve_reference(value, base))
    }
}

/// Resolves one reference, returning it unchanged when it should stay as is
fn resolve_reference(value: &str, base: &Url) -> String {
    let trimmed = value.trim();
    let lower = trimmed.to_ascii_lowercase();
    if trimmed.is_empty()
        || trimmed.starts_with('#')
        || ["mailto:", "tel:", "javascript:", "data:"]
            .iter()
            .any(|scheme| lower.starts_with(scheme))
    {
        return value.to_string();
    }

    match base.join(trimmed) {
        Ok(url) => url.to_string(),
        Err(_) => value.to_string(),
    }
}

/// Resolves each candidate of a `srcset` list, keeping its descriptor
fn rewrite_srcset(value: &str, base: &Url) -> String {
    value
        .split(',')
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .map(|candidate| match candidate.rsplit_once(char::is_whitespace) {
            Some((url, descriptor)) => {
                format!("{} {}", resolve_reference(url.trim(), base), descriptor)
            }
            None => resolve_reference(candidate, base),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
