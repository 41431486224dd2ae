//! URL handling module for url2md
//!
//! This module provides URL normalization and the scope boundary used by the
//! frontier to decide which discovered links belong to a crawl.

mod normalize;
mod scope;

pub use normalize::{normalize_relative, normalize_url};
pub use scope::Scope;
