//! Crawl coordinator - run orchestration
//!
//! A run moves through four phases:
//! - Discovering: build the fixed list of URLs to process, either by
//!   following links from a seed or from a literal list / sitemap
//! - AwaitingConfirmation: let the operator approve the list
//! - Processing: fetch, normalize, render, post-process and write each URL
//! - Done: report the summary
//!
//! Everything is sequential. Every request goes through a [`PacedFetcher`],
//! so the configured delay separates all of them, across both phases.

use crate::config::Config;
use crate::content::{ContentNormalizer, Html2MdRenderer, Renderer};
use crate::crawler::confirm::{AutoConfirm, Confirmation, StdinConfirmation};
use crate::crawler::fetcher::{Fetcher, HttpFetcher, PacedFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{extract_links, parse_page};
use crate::crawler::sitemap::resolve_sitemap;
use crate::output::{
    resolve_output_path, Artifact, ArtifactWriter, MarkdownWriter, RunStats, RunSummary,
};
use crate::postprocess::PostProcessor;
use crate::url::{normalize_url, Scope};
use crate::Url2mdError;
use scraper::Html;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// What a run starts from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Follow links from `seed`, staying under its path
    Crawl { seed: Url },

    /// Process the given URLs as they are
    List { urls: Vec<Url> },

    /// Process the pages listed in a sitemap
    Sitemap {
        url: Url,
        filter_path: Option<String>,
    },
}

/// Phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Discovering,
    AwaitingConfirmation,
    Processing,
    Done,
}

/// Main crawl coordinator structure
pub struct Coordinator {
    config: Config,
    fetcher: PacedFetcher,
    writer: Box<dyn ArtifactWriter>,
    renderer: Box<dyn Renderer>,
    confirmation: Box<dyn Confirmation>,
    normalizer: ContentNormalizer,
    postprocessor: PostProcessor,
    phase: CrawlPhase,
}

impl Coordinator {
    /// Creates a coordinator with explicit fetcher and writer
    ///
    /// Rendering uses [`Html2MdRenderer`]. Confirmation is automatic when
    /// `auto-confirm` is set and asked on the terminal otherwise.
    ///
    /// # Errors
    ///
    /// Fails if a cleanup or boilerplate pattern does not compile.
    pub fn new(
        config: Config,
        fetcher: Box<dyn Fetcher>,
        writer: Box<dyn ArtifactWriter>,
    ) -> Result<Self, Url2mdError> {
        let normalizer = ContentNormalizer::new(&config.cleanup)?;
        let postprocessor = PostProcessor::new(&config.boilerplate)?;
        let confirmation: Box<dyn Confirmation> = if config.crawler.auto_confirm {
            Box::new(AutoConfirm)
        } else {
            Box::new(StdinConfirmation)
        };

        let fetcher = PacedFetcher::new(
            fetcher,
            Duration::from_millis(config.crawler.delay_ms),
        );

        Ok(Self {
            config,
            fetcher,
            writer,
            renderer: Box::new(Html2MdRenderer),
            confirmation,
            normalizer,
            postprocessor,
            phase: CrawlPhase::Discovering,
        })
    }

    /// Creates a coordinator fetching over HTTP and writing Markdown files
    /// under the configured output directory
    pub fn from_config(config: Config) -> Result<Self, Url2mdError> {
        let fetcher = HttpFetcher::new(&config.user_agent)?;
        let writer = MarkdownWriter::new(&config.output.directory);
        Self::new(config, Box::new(fetcher), Box::new(writer))
    }

    /// Replaces the Markdown renderer
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Replaces the confirmation step
    pub fn with_confirmation(mut self, confirmation: Box<dyn Confirmation>) -> Self {
        self.confirmation = confirmation;
        self
    }

    /// Current phase
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Runs all phases and returns the summary
    ///
    /// Per-URL failures never surface as errors; they are counted in the
    /// summary. Only an unusable sitemap fails the run.
    pub async fn run(&mut self, mode: RunMode) -> Result<RunSummary, Url2mdError> {
        let mut stats = RunStats::new();
        self.phase = CrawlPhase::Discovering;
        self.fetcher.reset();

        let urls = match self.discover(mode).await {
            Ok(urls) => urls,
            Err(e) => {
                self.phase = CrawlPhase::Done;
                return Err(e);
            }
        };
        stats.set_discovered(urls.len());
        tracing::info!("Discovery finished: {} URLs", urls.len());

        self.phase = CrawlPhase::AwaitingConfirmation;
        if !self.confirmation.confirm(&urls) {
            tracing::info!("Run declined, nothing processed");
            return Ok(self.finish(&stats));
        }

        self.phase = CrawlPhase::Processing;
        self.process_all(&urls, &mut stats).await;

        Ok(self.finish(&stats))
    }

    fn finish(&mut self, stats: &RunStats) -> RunSummary {
        self.phase = CrawlPhase::Done;
        let summary = stats.summarize();
        tracing::info!(
            "Run completed: {} ({} requests)",
            summary,
            self.fetcher.requests()
        );
        summary
    }

    /// Builds the ordered list of URLs to process
    async fn discover(&mut self, mode: RunMode) -> Result<Vec<Url>, Url2mdError> {
        let max_urls = self.config.crawler.max_urls;

        match mode {
            RunMode::Crawl { seed } => {
                let seed = normalize_url(seed.as_str())?;
                Ok(self.crawl_discover(&seed).await)
            }
            RunMode::List { urls } => Ok(fixed_list(urls.iter().map(Url::as_str), max_urls)),
            RunMode::Sitemap { url, filter_path } => {
                let timeout = self.timeout();
                let listed =
                    resolve_sitemap(&self.fetcher, &url, filter_path.as_deref(), timeout).await?;
                tracing::info!("{} URLs found in sitemap", listed.len());
                Ok(fixed_list(listed.iter().map(Url::as_str), max_urls))
            }
        }
    }

    /// Breadth-first link discovery from a seed
    ///
    /// Pages are fetched only to find further links; a page whose children
    /// could not be accepted anyway is not fetched. Failed pages stay in the
    /// list so that processing records them.
    async fn crawl_discover(&mut self, seed: &Url) -> Vec<Url> {
        let crawler = &self.config.crawler;
        let scope = Scope::from_seed(seed);
        tracing::info!(
            "Crawling {} (base path {}, max depth {}, max URLs {})",
            seed,
            scope.base_path(),
            crawler.max_depth,
            crawler.max_urls
        );

        let mut frontier = Frontier::new(scope, crawler.max_depth, crawler.max_urls);
        frontier.enqueue(seed.as_str(), 0);

        let mut discovered = Vec::new();
        while let Some(queued) = frontier.dequeue() {
            discovered.push(queued.url.clone());

            let child_depth = queued.depth + 1;
            if !frontier.accepts_depth(child_depth) || frontier.is_full() {
                continue;
            }

            tracing::debug!(
                "Discovering links on {} (depth {}, {} pending)",
                queued.url,
                queued.depth,
                frontier.len()
            );
            let document = match self.fetch_document(&queued.url).await {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!("Discovery failed for {}: {}", queued.url, e);
                    continue;
                }
            };

            let links = extract_links(&document, &queued.url);
            let added = links
                .iter()
                .filter(|link| frontier.enqueue(link.as_str(), child_depth))
                .count();
            tracing::debug!("{} links found, {} queued", links.len(), added);
        }

        discovered
    }

    async fn process_all(&mut self, urls: &[Url], stats: &mut RunStats) {
        let continue_on_error = self.config.crawler.continue_on_error;

        for (index, url) in urls.iter().enumerate() {
            tracing::info!("[{}/{}] {}", index + 1, urls.len(), url);

            match self.process_url(url).await {
                Ok(path) => {
                    stats.record_success();
                    tracing::info!("Saved {}", path.display());
                }
                Err(Url2mdError::Write(e)) => {
                    stats.record_failure();
                    tracing::error!("Failed to save {}: {}", url, e);
                }
                Err(e) => {
                    stats.record_failure();
                    tracing::error!("Failed to process {}: {}", url, e);
                    if !continue_on_error {
                        tracing::warn!("Stopping after first failure");
                        break;
                    }
                }
            }
        }
    }

    /// Turns one URL into a written artifact
    async fn process_url(&mut self, url: &Url) -> Result<PathBuf, Url2mdError> {
        let document = self.fetch_document(url).await?;

        let page = self.normalizer.normalize(document, url);
        let markdown = self.renderer.render(&page.html);
        let body = self.postprocessor.process(&markdown);

        let relative_path = resolve_output_path(url, &page.title);
        let artifact = Artifact::new(page.title, body, url.clone());

        Ok(self.writer.write(&artifact, &relative_path)?)
    }

    async fn fetch_document(&self, url: &Url) -> Result<Html, Url2mdError> {
        let raw = self.fetcher.fetch(url, self.timeout()).await?;
        Ok(parse_page(&raw)?)
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.crawler.timeout_secs)
    }
}

/// Deduplicates a literal URL list, keeping first occurrences in order
fn fixed_list<'a>(urls: impl Iterator<Item = &'a str>, max_urls: usize) -> Vec<Url> {
    let mut frontier = Frontier::new(Scope::any(), 0, max_urls);
    for url in urls {
        frontier.enqueue(url, 0);
    }
    std::iter::from_fn(|| frontier.dequeue())
        .map(|queued| queued.url)
        .collect()
}
