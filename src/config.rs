//! Configuration loading and management for magic-tutor.
//!
//! Loads settings from `magic-tutor.toml` with environment variable overrides
//! for sensitive data. Every section has defaults, so running without a file
//! is fine as long as the API key is in the environment.

use crate::scraper::ExtractionRules;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE: &str = "magic-tutor.toml";

/// Default browser identification for page fetches
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_PERSONA: &str = "You are a helpful and accurate language summarizer.
Summarize clearly in English.
Focus on main points, arguments, and conclusions.
Use bullet points and clear sections.
Mention if content is incomplete.
NEVER fabricate information.

IMPORTANT to follow:
- Format the output with visual clarity: add relevant emojis to section titles, use headers and subheaders, bullet lists, proper spacing, and clean logical structure.
- Do NOT return a raw chunk of text; organize output by themes, story flow, or highlights.";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("missing required API key for provider: {0}")]
    MissingApiKey(String),
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// LLM provider, only "gemini" is supported
    pub provider: String,
    /// Model identifier (e.g., "gemini-2.5-flash")
    pub model: String,
    /// System instruction sent ahead of every request
    pub persona: String,
}

/// API keys configuration (loaded from environment)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub gemini_key: Option<String>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the API listens on
    pub bind: String,
}

/// What the pipeline does when extraction fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionFailurePolicy {
    /// Summarize the failure message as if it were content
    #[default]
    Summarize,
    /// Answer the request with a client error
    Reject,
}

/// Page fetch and extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub on_failure: ExtractionFailurePolicy,
    #[serde(flatten)]
    pub rules: ExtractionRules,
}

/// Bearer tokens accepted by the API
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub tokens: Vec<String>,
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from the default location, falling back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from(&path)?,
            None => Config::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from a specific path, without environment overrides
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.api.gemini_key = Some(key);
        }
        if let Some(bind) = lookup("MAGIC_TUTOR_BIND") {
            self.server.bind = bind;
        }
        if let Some(tokens) = lookup("MAGIC_TUTOR_TOKENS") {
            self.auth.tokens = tokens
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect();
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        let home_config = dirs::home_dir()?
            .join(".config")
            .join("magic-tutor")
            .join(CONFIG_FILE);
        home_config.exists().then_some(home_config)
    }

    /// Get the API key for the configured provider
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        match self.agent.provider.as_str() {
            "gemini" => self
                .api
                .gemini_key
                .as_deref()
                .ok_or_else(|| ConfigError::MissingApiKey("gemini".to_string())),
            other => Err(ConfigError::MissingApiKey(other.to_string())),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
            persona: DEFAULT_PERSONA.to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: BROWSER_USER_AGENT.to_string(),
            on_failure: ExtractionFailurePolicy::default(),
            rules: ExtractionRules::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults_match_the_fetch_contract() {
        let config = Config::default();
        assert_eq!(config.extraction.timeout_secs, 10);
        assert_eq!(config.extraction.rules.max_chars, 10_000);
        assert_eq!(config.extraction.rules.content_selectors[0], "article");
        assert!(config.extraction.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.extraction.on_failure, ExtractionFailurePolicy::Summarize);
    }

    #[test]
    fn missing_key_is_an_error() {
        let config = Config::default();
        assert!(matches!(config.api_key(), Err(ConfigError::MissingApiKey(p)) if p == "gemini"));
    }

    #[test]
    fn env_overrides() {
        let env: HashMap<&str, &str> = [
            ("GEMINI_API_KEY", "secret"),
            ("MAGIC_TUTOR_BIND", "0.0.0.0:8080"),
            ("MAGIC_TUTOR_TOKENS", "alpha, beta,,"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.api_key().unwrap(), "secret");
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.auth.tokens, vec!["alpha", "beta"]);
    }

    #[test]
    fn blank_api_key_is_ignored() {
        let mut config = Config::default();
        config.apply_env(|name| (name == "GEMINI_API_KEY").then(|| "  ".to_string()));
        assert!(config.api_key().is_err());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r##"
[agent]
model = "gemini-2.5-pro"

[extraction]
timeout_secs = 5
on_failure = "reject"
content_selectors = ["#story"]
"##
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.agent.model, "gemini-2.5-pro");
        assert_eq!(config.agent.provider, "gemini");
        assert_eq!(config.extraction.timeout_secs, 5);
        assert_eq!(config.extraction.on_failure, ExtractionFailurePolicy::Reject);
        assert_eq!(config.extraction.rules.content_selectors, vec!["#story"]);
        assert_eq!(config.extraction.rules.min_chars, 50);
        assert_eq!(config.server.bind, "127.0.0.1:3000");
    }
}
