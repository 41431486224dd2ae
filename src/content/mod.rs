//! Content normalization
//!
//! This module turns a parsed page into the HTML handed to the renderer:
//! - Title extraction through an ordered fallback chain
//! - Structural removal of navigation, ads and other page chrome
//! - Rewriting relative references to absolute URLs
//! - Markdown rendering behind the [`Renderer`] trait

mod absolutize;
mod cleanup;
mod render;
mod title;

pub use absolutize::{absolutize_html, absolutize_references};
pub use cleanup::{Cleaner, CleanupOutcome};
pub use render::{Html2MdRenderer, Renderer};
pub use title::{extract_title, UNTITLED};

use crate::config::CleanupConfig;
use crate::ConfigError;
use scraper::Html;
use url::Url;

/// A page after structural cleanup, ready for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPage {
    /// Extracted title, or [`UNTITLED`]
    pub title: String,

    /// Cleaned body HTML with absolute references
    pub html: String,
}

/// Applies title extraction, cleanup and link absolutization to a page
#[derive(Debug, Clone)]
pub struct ContentNormalizer {
    cleaner: Cleaner,
}

impl ContentNormalizer {
    /// Builds a normalizer from the cleanup denylists
    pub fn new(config: &CleanupConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            cleaner: Cleaner::new(config)?,
        })
    }

    /// Normalizes a parsed page fetched from `source`
    ///
    /// The title is read before cleanup, since header regions that hold the
    /// page's `<h1>` are among the elements cleanup removes.
    pub fn normalize(&self, mut document: Html, source: &Url) -> NormalizedPage {
        let title = extract_title(&document);
        let outcome = self.cleaner.clean(&mut document);
        tracing::debug!(
            "Removed {} boilerplate elements from {}",
            outcome.removed,
            source
        );

        NormalizedPage {
            title,
            html: absolutize_html(&mut document, source),
        }
    }
}
