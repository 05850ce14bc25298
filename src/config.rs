use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = ".repo-scout.toml";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = "repo-scout";
pub const DEFAULT_PER_PAGE: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .repo-scout.toml.
/// All fields are optional; the tool works with zero config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to GITHUB_TOKEN env var.
    pub token: Option<String>,
    /// Base URL of the REST API (GitHub Enterprise installs differ)
    pub api_url: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Results per page for both repositories and contributors
    pub per_page: u32,
    /// Sort key passed to the search endpoint
    pub sort: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            sort: "stars".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Drop responses that arrive after a newer request for the same list was issued
    pub discard_stale_responses: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            discard_stale_responses: true,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from .repo-scout.toml in the
    /// current directory when no path is given.
    /// A missing default file yields the default config; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from(default_path)?
                } else {
                    Config::default()
                }
            }
        };

        config.github.token = resolve_token(config.github.token.take(), env_token());

        Ok(config)
    }

    /// Load from a specific path.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the GitHub token: config file value takes precedence,
    /// falls back to GITHUB_TOKEN env var. Blank tokens count as absent.
    pub fn github_token(&self) -> Option<String> {
        resolve_token(self.github.token.clone(), env_token())
    }

    pub fn api_url(&self) -> &str {
        self.github
            .api_url
            .as_deref()
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
    }

    pub fn user_agent(&self) -> &str {
        self.github
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Page size clamped to what the API accepts (1..=100).
    pub fn per_page(&self) -> u32 {
        self.search.per_page.clamp(1, 100)
    }
}

fn env_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN").ok()
}

/// A non-blank configured token wins over the environment's.
fn resolve_token(configured: Option<String>, env: Option<String>) -> Option<String> {
    let usable = |token: &String| !token.trim().is_empty();
    configured.filter(usable).or_else(|| env.filter(usable))
}
