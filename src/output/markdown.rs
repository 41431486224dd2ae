//! Markdown artifact files
//!
//! Each artifact becomes one `.md` file with a small frontmatter block:
//!
//! ```text
//! ---
//! title: Getting Started
//! created: 2024-05-01 14:03:22
//! source: https://example.com/docs/start
//! ---
//!
//! <body>
//! ```

use crate::output::traits::{Artifact, ArtifactWriter};
use crate::WriteError;
use std::fs;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writes artifacts as Markdown files under a root directory
#[derive(Debug, Clone)]
pub struct MarkdownWriter {
    root: PathBuf,
}

impl MarkdownWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactWriter for MarkdownWriter {
    fn write(&self, artifact: &Artifact, relative_path: &Path) -> Result<PathBuf, WriteError> {
        let path = self.root.join(relative_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
        }

        fs::write(&path, render_document(artifact)).map_err(|source| WriteError::WriteFile {
            path: path.display().to_string(),
            source,
        })?;

        Ok(path)
    }
}

/// Formats the full file contents: frontmatter, blank line, body
pub fn render_document(artifact: &Artifact) -> String {
    let mut doc = String::with_capacity(artifact.body.len() + 128);

    doc.push_str("---\n");
    doc.push_str(&format!("title: {}\n", frontmatter_value(&artifact.title)));
    doc.push_str(&format!(
        "created: {}\n",
        artifact.created.format(TIMESTAMP_FORMAT)
    ));
    doc.push_str(&format!("source: {}\n", artifact.source));
    doc.push_str("---\n\n");
    doc.push_str(&artifact.body);

    doc
}

/// Quotes a scalar when a YAML reader would misread it bare
fn frontmatter_value(value: &str) -> String {
    let needs_quotes = value.contains(": ")
        || value.contains(" #")
        || value.ends_with(':')
        || value
            .chars()
            .next()
            .is_some_and(|c| "#&*!|>'\"%@`[]{},-?".contains(c));

    if needs_quotes {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}
