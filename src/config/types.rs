use serde::Deserialize;

/// Main configuration structure for url2md
///
/// Every section is optional in the TOML file; missing values take the
/// defaults below. Command-line flags are applied on top of the loaded file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    pub cleanup: CleanupConfig,
    pub boilerplate: BoilerplateConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum link depth from the seed (0 = unlimited)
    pub max_depth: u32,

    /// Maximum number of URLs ever enqueued (0 = unlimited)
    pub max_urls: usize,

    /// Pause between two requests (milliseconds)
    pub delay_ms: u64,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Keep processing after a fetch or parse failure
    pub continue_on_error: bool,

    /// Skip the confirmation prompt after discovery
    pub auto_confirm: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            max_urls: 0,
            delay_ms: 1000,
            timeout_secs: 30,
            continue_on_error: true,
            auto_confirm: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// Optional URL with information about the crawler
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "url2md".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Root directory artifacts are written under
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "output".to_string(),
        }
    }
}

/// Structural cleanup denylists
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CleanupConfig {
    /// Tag names removed with their whole subtree
    pub remove_tags: Vec<String>,

    /// Case-insensitive fragments matched against class tokens and ids
    pub remove_class_patterns: Vec<String>,

    /// Case-insensitive regex matched against `href` to find skip links
    pub skip_link_pattern: String,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        let tags = [
            "nav", "header", "footer", "aside", "script", "style", "iframe", "noscript", "button",
            "form",
        ];
        let classes = [
            "navigation",
            "navbar",
            "sidebar",
            "menu",
            "footer",
            "header",
            "breadcrumb",
            "social",
            "share",
            "cookie",
            "advertisement",
            "ad-",
            "banner",
            "popup",
            "skip",
        ];
        Self {
            remove_tags: tags.iter().map(|s| s.to_string()).collect(),
            remove_class_patterns: classes.iter().map(|s| s.to_string()).collect(),
            skip_link_pattern: r"#.*top|#content|#main".to_string(),
        }
    }
}

/// Locale-specific navigation chrome stripped from rendered Markdown
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BoilerplateConfig {
    /// Regexes matched case-insensitively against whole lines
    pub line_patterns: Vec<String>,
}

impl Default for BoilerplateConfig {
    fn default() -> Self {
        let patterns = [
            // Starlight-style heading anchors, French locale
            r"^\[Section intitul[eé]e[^\]]+\]\([^)]+\)\s*$",
            r#"^Section intitul[eé]e\s+[«"][^»"]+[»"]\s*$"#,
            r"^\[Fen[eê]tre de terminal\]\([^)]+\)\s*$",
            r"^Fen[eê]tre de terminal\s*$",
            r"^\[Aller au contenu\]\([^)]+\)\s*$",
            r"^Glissez pour voir\s*$",
            // English equivalents
            r"^\[Section titled[^\]]+\]\([^)]+\)\s*$",
            r"^\[Skip to (main )?content\]\([^)]+\)\s*$",
            r"^Terminal window\s*$",
        ];
        Self {
            line_patterns: patterns.iter().map(|s| s.to_string()).collect(),
        }
    }
}
