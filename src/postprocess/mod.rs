//! Markdown post-processing
//!
//! Rendered Markdown goes through a fixed, ordered list of text steps. Each
//! step is a pure `&str -> String` function, and the order is declared once
//! in [`PIPELINE`].

mod boilerplate;
mod transforms;

pub use boilerplate::BoilerplatePatterns;
pub use transforms::{
    normalize_whitespace, remove_first_heading, repair_code_blocks, repair_word_breaks,
};

use crate::config::BoilerplateConfig;
use crate::ConfigError;

/// One post-processing step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    WordBreaks,
    CodeBlocks,
    Boilerplate,
    Whitespace,
    LeadingHeading,
}

/// Order in which the steps run
///
/// Word-break repair runs a second time because removing the heading can
/// bring two broken halves next to each other.
pub const PIPELINE: &[Step] = &[
    Step::WordBreaks,
    Step::CodeBlocks,
    Step::Boilerplate,
    Step::Whitespace,
    Step::LeadingHeading,
    Step::WordBreaks,
];

/// Runs the post-processing pipeline over rendered Markdown
#[derive(Debug, Clone)]
pub struct PostProcessor {
    boilerplate: BoilerplatePatterns,
}

impl PostProcessor {
    pub fn new(config: &BoilerplateConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            boilerplate: BoilerplatePatterns::new(config)?,
        })
    }

    pub fn process(&self, markdown: &str) -> String {
        PIPELINE
            .iter()
            .fold(markdown.to_string(), |text, step| self.apply(*step, &text))
    }

    fn apply(&self, step: Step, text: &str) -> String {
        match step {
            Step::WordBreaks => repair_word_breaks(text),
            Step::CodeBlocks => repair_code_blocks(text),
            Step::Boilerplate => self.boilerplate.strip(text),
            Step::Whitespace => normalize_whitespace(text),
            Step::LeadingHeading => remove_first_heading(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> PostProcessor {
        PostProcessor::new(&BoilerplateConfig::default()).unwrap()
    }

    #[test]
    fn test_full_pipeline() {
        let markdown = "\n\n# Guide Docker\n\n[Aller au contenu](#_top)\n\n\n\nUne solution effi\ncace.   \n\n## Installation\n\n```bash\n# Mise à joursudo apt update\n```\n\n\n";
        let out = processor().process(markdown);

        assert_eq!(
            out,
            "Une solution efficace.\n\n## Installation\n\n```bash\n# Mise à jour\nsudo apt update\n```\n"
        );
    }

    #[test]
    fn test_pipeline_is_idempotent_without_h1() {
        let processor = processor();
        let once = processor.process("# Title\n\nSome effi\ncace text\n\n\n\n## More\n\nBody  \n");
        assert!(!once.contains("# Title"));
        assert_eq!(processor.process(&once), once);
    }

    #[test]
    fn test_only_first_h1_removed() {
        let out = processor().process("# One\n\nText\n\n# Two\n\nMore\n");
        assert_eq!(out, "Text\n\n# Two\n\nMore\n");
    }

    #[test]
    fn test_setext_title_removed() {
        let out = processor().process("Page Title\n==========\n\nContent here.\n");
        assert_eq!(out, "Content here.\n");
    }

    #[test]
    fn test_heading_removal_rejoins_split_word() {
        let out = processor().process("Intro effi\n# Title\ncace\n");
        assert_eq!(out, "Intro efficace\n");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(processor().process(""), "");
        assert_eq!(processor().process("\n\n  \n"), "");
    }
}
