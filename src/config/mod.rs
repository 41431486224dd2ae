//! Configuration module for url2md
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, and reading URL list files.
//!
//! # Example
//!
//! ```no_run
//! use url2md::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("url2md.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    BoilerplateConfig, CleanupConfig, Config, CrawlerConfig, OutputConfig, UserAgentConfig,
};

pub use parser::{load_config, load_url_list, parse_config};
pub use validation::validate;
