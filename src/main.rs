//! url2md main entry point
//!
//! This is the command-line interface for converting web pages to Markdown.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url2md::config::{load_config, load_url_list, validate, Config};
use url2md::crawler::{run, RunMode};
use url2md::normalize_url;
use url2md::output::print_summary;

/// url2md: converts web pages into clean Markdown files
///
/// Pages are fetched, stripped of navigation and other page chrome, and
/// written as Markdown with a small frontmatter block. Output mirrors the
/// site layout: `<output>/<host>/<path>/<title>.md`.
#[derive(Parser, Debug)]
#[command(name = "url2md")]
#[command(version)]
#[command(about = "Converts web pages into clean Markdown files", long_about = None)]
struct Cli {
    /// URLs to convert (the seed with --crawl, the sitemap with --sitemap)
    #[arg(value_name = "URLS")]
    urls: Vec<String>,

    /// Output directory [default: output]
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Follow links from the URL, staying under its path
    #[arg(short, long, conflicts_with = "sitemap")]
    crawl: bool,

    /// Maximum link depth when crawling (0 = unlimited) [default: 1]
    #[arg(short = 'd', long, value_name = "N")]
    max_depth: Option<u32>,

    /// Maximum number of URLs to process (0 = unlimited)
    #[arg(long, value_name = "N")]
    max_urls: Option<usize>,

    /// Treat the URL as a sitemap and convert the pages it lists
    #[arg(short, long)]
    sitemap: bool,

    /// Only keep sitemap URLs whose path starts with this prefix
    #[arg(long, value_name = "PREFIX", requires = "sitemap")]
    filter_path: Option<String>,

    /// Read URLs from a file, one per line
    #[arg(short, long, value_name = "PATH", conflicts_with_all = ["crawl", "sitemap"])]
    file: Option<PathBuf>,

    /// Pause between requests in seconds [default: 1.0]
    #[arg(long, value_name = "SECONDS")]
    delay: Option<f64>,

    /// Stop at the first page that fails
    #[arg(long)]
    stop_on_error: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,

    /// Per-request timeout in seconds [default: 30]
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Path to an optional TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let mode = build_mode(&cli)?;

    tracing::info!("Writing artifacts under {}", config.output.directory);
    match run(config, mode).await {
        Ok(summary) => {
            if !cli.quiet {
                print_summary(&summary);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("url2md=info,warn"),
            1 => EnvFilter::new("url2md=debug,info"),
            2 => EnvFilter::new("url2md=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the optional config file and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.output.directory = output.display().to_string();
    }
    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(max_urls) = cli.max_urls {
        config.crawler.max_urls = max_urls;
    }
    if let Some(delay) = cli.delay {
        if !delay.is_finite() || delay < 0.0 {
            bail!("--delay must be a non-negative number of seconds, got {}", delay);
        }
        config.crawler.delay_ms = (delay * 1000.0).round() as u64;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.timeout_secs = timeout;
    }
    if cli.stop_on_error {
        config.crawler.continue_on_error = false;
    }
    if cli.yes {
        config.crawler.auto_confirm = true;
    }

    validate(&config).context("Invalid settings")?;
    Ok(config)
}

/// Picks the run mode from the flags and parses every input URL up front
fn build_mode(cli: &Cli) -> anyhow::Result<RunMode> {
    if cli.crawl || cli.sitemap {
        let [input] = cli.urls.as_slice() else {
            bail!(
                "--{} takes exactly one URL, got {}",
                if cli.crawl { "crawl" } else { "sitemap" },
                cli.urls.len()
            );
        };
        let url = normalize_url(input).with_context(|| format!("Invalid URL '{}'", input))?;

        return Ok(if cli.crawl {
            RunMode::Crawl { seed: url }
        } else {
            RunMode::Sitemap {
                url,
                filter_path: cli.filter_path.clone(),
            }
        });
    }

    let mut inputs = cli.urls.clone();
    if let Some(path) = &cli.file {
        let listed = load_url_list(path)?;
        tracing::info!("{} URLs read from {}", listed.len(), path.display());
        inputs.extend(listed);
    }

    if inputs.is_empty() {
        bail!("No URL given (pass URLs as arguments or use --file)");
    }

    let urls = inputs
        .iter()
        .map(|input| normalize_url(input).with_context(|| format!("Invalid URL '{}'", input)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(RunMode::List { urls })
}
