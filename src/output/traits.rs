//! Artifact type and writer trait
//!
//! The orchestrator hands every finished page to an [`ArtifactWriter`]. The
//! default implementation writes Markdown files; tests substitute in-memory
//! writers.

use crate::WriteError;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use url::Url;

/// A finished page ready to be persisted
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Extracted title, or `"untitled"`
    pub title: String,

    /// Post-processed Markdown body
    pub body: String,

    /// URL the page was fetched from
    pub source: Url,

    /// When the artifact was produced
    pub created: DateTime<Local>,
}

impl Artifact {
    /// Creates an artifact stamped with the current local time
    pub fn new(title: impl Into<String>, body: impl Into<String>, source: Url) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            source,
            created: Local::now(),
        }
    }
}

/// Persists artifacts
///
/// `relative_path` comes from [`resolve_output_path`](crate::output::resolve_output_path);
/// implementations decide where it is rooted. Returns the final location.
pub trait ArtifactWriter: Send + Sync {
    fn write(&self, artifact: &Artifact, relative_path: &Path) -> Result<PathBuf, WriteError>;
}
