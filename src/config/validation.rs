use crate::config::types::{
    BoilerplateConfig, CleanupConfig, Config, CrawlerConfig, OutputConfig, UserAgentConfig,
};
use crate::ConfigError;
use regex::RegexBuilder;
use url::Url;

/// Elements the cleanup pass must never remove
const PROTECTED_TAGS: &[&str] = &["html", "head", "body"];

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_cleanup_config(&config.cleanup)?;
    validate_boilerplate_config(&config.boilerplate)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > 600 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 600, got {}",
            config.timeout_secs
        )));
    }

    if config.delay_ms > 600_000 {
        return Err(ConfigError::Validation(format!(
            "delay-ms must be <= 600000, got {}",
            config.delay_ms
        )));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_cleanup_config(config: &CleanupConfig) -> Result<(), ConfigError> {
    for tag in &config.remove_tags {
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ConfigError::Validation(format!(
                "remove-tags entry '{}' is not a tag name",
                tag
            )));
        }
        if PROTECTED_TAGS.contains(&tag.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "remove-tags cannot contain '{}'",
                tag
            )));
        }
    }

    if config.remove_class_patterns.iter().any(|p| p.is_empty()) {
        return Err(ConfigError::Validation(
            "remove-class-patterns entries cannot be empty".to_string(),
        ));
    }

    check_pattern(&config.skip_link_pattern)
}

fn validate_boilerplate_config(config: &BoilerplateConfig) -> Result<(), ConfigError> {
    config
        .line_patterns
        .iter()
        .try_for_each(|pattern| check_pattern(pattern))
}

fn check_pattern(pattern: &str) -> Result<(), ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}
