//! Crawler module for URL discovery and page processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Fetcher`] trait
//! - HTML parsing and link extraction
//! - Sitemap resolution
//! - The scoped URL frontier
//! - Overall run coordination

mod confirm;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod sitemap;

pub use confirm::{AutoConfirm, Confirmation, StdinConfirmation};
pub use coordinator::{Coordinator, CrawlPhase, RunMode};
pub use fetcher::{build_http_client, Fetcher, HttpFetcher, PacedFetcher};
pub use frontier::{Frontier, QueuedUrl};
pub use parser::{extract_links, parse_page};
pub use sitemap::{parse_sitemap, resolve_sitemap, SitemapDocument, MAX_SITEMAP_NESTING};

use crate::config::Config;
use crate::output::RunSummary;
use crate::Url2mdError;

/// Runs a complete url2md operation over HTTP
///
/// Artifacts are written under `config.output.directory`.
///
/// # Example
///
/// ```no_run
/// use url2md::config::Config;
/// use url2md::crawler::{run, RunMode};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let seed = Url::parse("https://example.com/docs/")?;
/// let summary = run(Config::default(), RunMode::Crawl { seed }).await?;
/// println!("{}", summary);
/// # Ok(())
/// # }
/// ```
pub async fn run(config: Config, mode: RunMode) -> Result<RunSummary, Url2mdError> {
    let mut coordinator = Coordinator::from_config(config)?;
    coordinator.run(mode).await
}

#[cfg(test)]
pub(crate) mod test_support {
    //! In-memory fetcher and writer doubles

    use super::Fetcher;
    use crate::output::{Artifact, ArtifactWriter};
    use crate::{FetchError, WriteError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use url::Url;

    /// Serves fixed bodies by URL; anything else is a 404
    #[derive(Debug, Clone, Default)]
    pub(crate) struct MapFetcher {
        pages: HashMap<String, String>,
        attempts: Arc<Mutex<Vec<String>>>,
    }

    impl MapFetcher {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        /// Every URL fetched so far, in order
        pub(crate) fn attempts(&self) -> Vec<String> {
            self.attempts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for MapFetcher {
        async fn fetch(&self, url: &Url, _timeout: Duration) -> Result<String, FetchError> {
            self.attempts.lock().unwrap().push(url.to_string());
            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    /// Keeps written artifacts in memory
    #[derive(Debug, Clone, Default)]
    pub(crate) struct MemoryWriter {
        written: Arc<Mutex<Vec<(PathBuf, Artifact)>>>,
        fail_on: Option<String>,
    }

    impl MemoryWriter {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        /// Fails writes whose path contains `fragment`
        pub(crate) fn failing_on(mut self, fragment: &str) -> Self {
            self.fail_on = Some(fragment.to_string());
            self
        }

        pub(crate) fn artifacts(&self) -> Vec<(PathBuf, Artifact)> {
            self.written.lock().unwrap().clone()
        }

        pub(crate) fn paths(&self) -> Vec<PathBuf> {
            self.artifacts().into_iter().map(|(path, _)| path).collect()
        }
    }

    impl ArtifactWriter for MemoryWriter {
        fn write(&self, artifact: &Artifact, relative_path: &Path) -> Result<PathBuf, WriteError> {
            let display = relative_path.display().to_string();
            if self
                .fail_on
                .as_deref()
                .is_some_and(|fragment| display.contains(fragment))
            {
                return Err(WriteError::WriteFile {
                    path: display,
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
                });
            }

            self.written
                .lock()
                .unwrap()
                .push((relative_path.to_path_buf(), artifact.clone()));
            Ok(relative_path.to_path_buf())
        }
    }
}
