use crate::config::BoilerplateConfig;
use crate::ConfigError;
use regex::{Regex, RegexBuilder};

/// Compiled line patterns for boilerplate stripping
#[derive(Debug, Clone)]
pub struct BoilerplatePatterns {
    patterns: Vec<Regex>,
}

impl BoilerplatePatterns {
    pub fn new(config: &BoilerplateConfig) -> Result<Self, ConfigError> {
        let patterns = config
            .line_patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ConfigError::InvalidPattern {
                        pattern: pattern.clone(),
                        message: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    pub fn is_boilerplate(&self, line: &str) -> bool {
        let line = line.trim();
        !line.is_empty() && self.patterns.iter().any(|re| re.is_match(line))
    }

    /// Blanks every matching line
    ///
    /// Lines are emptied rather than dropped; whitespace normalization
    /// collapses what is left behind.
    pub fn strip(&self, text: &str) -> String {
        text.split('\n')
            .map(|line| if self.is_boilerplate(line) { "" } else { line })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> BoilerplatePatterns {
        BoilerplatePatterns::new(&BoilerplateConfig::default()).unwrap()
    }

    #[test]
    fn test_strips_french_chrome() {
        let text = "Intro\n[Section intitulée « Installation »](#installation)\nFenêtre de terminal\n[Aller au contenu](#_top)\nBody";
        assert_eq!(patterns().strip(text), "Intro\n\n\n\nBody");
    }

    #[test]
    fn test_strips_english_chrome_case_insensitively() {
        let text = "[skip to Main Content](#main)\nTERMINAL WINDOW\nText";
        assert_eq!(patterns().strip(text), "\n\nText");
    }

    #[test]
    fn test_keeps_lines_that_only_mention_patterns() {
        let text = "Open a Fenêtre de terminal and type the command.";
        assert_eq!(patterns().strip(text), text);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let config = BoilerplateConfig {
            line_patterns: vec!["(unclosed".to_string()],
        };
        assert!(matches!(
            BoilerplatePatterns::new(&config),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }
}
