//! url2md: converts web pages into clean Markdown artifacts
//!
//! This crate discovers pages under a URL scope (by following links or by
//! reading a sitemap), strips page chrome from each one and writes a Markdown
//! file with frontmatter per page, mirroring the site's path hierarchy.

pub mod config;
pub mod content;
pub mod crawler;
pub mod output;
pub mod postprocess;
pub mod url;

use thiserror::Error;

/// Main error type for url2md operations
#[derive(Debug, Error)]
pub enum Url2mdError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Write error: {0}")]
    Write(#[from] WriteError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Failed to read URL list {path}: {source}")]
    UrlList {
        path: String,
        source: std::io::Error,
    },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Errors returned by a page fetcher
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Connection failed for {url}: {message}")]
    Connection { url: String, message: String },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },
}

/// Errors raised while parsing fetched content
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Empty document")]
    EmptyDocument,

    #[error("Malformed sitemap {url}: {message}")]
    MalformedSitemap { url: String, message: String },
}

/// Errors raised while persisting an artifact
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteFile {
        path: String,
        source: std::io::Error,
    },
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, Frontier};
pub use output::{resolve_output_path, RunSummary};
pub use self::url::{normalize_url, Scope};
