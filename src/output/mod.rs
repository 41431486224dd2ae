//! Artifact output and run reporting
//!
//! This module handles:
//! - Mapping source URLs to artifact paths
//! - Writing Markdown artifacts with frontmatter
//! - Run statistics and the final summary

mod markdown;
mod path;
pub mod stats;
mod traits;

pub use markdown::{render_document, MarkdownWriter};
pub use path::{resolve_output_path, sanitize_filename};
pub use stats::{print_summary, RunStats, RunSummary};
pub use traits::{Artifact, ArtifactWriter};
