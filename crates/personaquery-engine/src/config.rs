//! Configuration for the PersonaQuery client.
//!
//! Settings are resolved in layers: built-in defaults, an optional JSON file,
//! the `PERSONAQUERY_API_URL` environment variable, and finally any explicit
//! override from the command line.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the answer service base address.
pub const API_URL_ENV: &str = "PERSONAQUERY_API_URL";

/// Base address used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Path of the question endpoint, relative to the base address.
pub const CHAT_PATH: &str = "/chat";

/// Path of the service health endpoint.
pub const HEALTH_PATH: &str = "/health";

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base address of the answer service.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Pre-authored questions offered on the landing view.
    #[serde(default = "default_quick_prompts")]
    pub quick_prompts: Vec<String>,

    /// Answering mode requested from the service. Omitted from requests when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<AskMode>,

    /// Number of passages the service should retrieve. Omitted when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

fn default_quick_prompts() -> Vec<String> {
    vec![
        "Top 3 GenAI projects".into(),
        "Best-fit roles".into(),
        "Key strengths (ATS)".into(),
        "Publications & patent".into(),
    ]
}

/// Answering mode understood by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AskMode {
    /// Regular question answering.
    Chat,
    /// First-person interview style answers.
    Interview,
}

impl AskMode {
    /// Parse a mode name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chat" => Some(Self::Chat),
            "interview" => Some(Self::Interview),
            _ => None,
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Default location of the user config file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("personaquery").join("config.json"))
    }

    /// Resolve the effective configuration.
    ///
    /// An explicitly given file must exist; the default file is optional.
    pub fn resolve(path: Option<&Path>, api_url: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env_value(std::env::var(API_URL_ENV).ok().as_deref());
        if let Some(url) = api_url {
            config.api_url = url.trim().to_string();
        }
        config.validate()?;
        Ok(config)
    }

    /// Apply the value of [`API_URL_ENV`]. Blank values count as unset.
    pub fn apply_env_value(&mut self, value: Option<&str>) {
        if let Some(url) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.api_url = url.to_string();
        }
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = normalize_base_url(&self.api_url);
        if base.is_empty() {
            return Err(ConfigError::Invalid("api_url is empty".into()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api_url must start with http:// or https:// (got {base:?})"
            )));
        }
        if self.quick_prompts.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::Invalid("quick prompts must not be blank".into()));
        }
        Ok(())
    }

    /// Full address of the question endpoint.
    pub fn chat_url(&self) -> String {
        build_api_url(&self.api_url, CHAT_PATH)
    }

    /// Full address of the health endpoint.
    pub fn health_url(&self) -> String {
        build_api_url(&self.api_url, HEALTH_PATH)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            quick_prompts: default_quick_prompts(),
            mode: None,
            top_k: None,
        }
    }
}

/// Strip surrounding whitespace and any trailing slashes from a base address.
pub fn normalize_base_url(base: &str) -> &str {
    base.trim().trim_end_matches('/')
}

/// Join a base address and an absolute path.
pub fn build_api_url(base: &str, path: &str) -> String {
    format!("{}{path}", normalize_base_url(base))
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Configuration values that cannot be used.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://127.0.0.1:8000");
        assert_eq!(config.quick_prompts.len(), 4);
        assert_eq!(config.quick_prompts[1], "Best-fit roles");
        assert!(config.mode.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_chat_url_strips_trailing_slashes() {
        let mut config = Config::default();
        assert_eq!(config.chat_url(), "http://127.0.0.1:8000/chat");

        config.api_url = "https://api.example.com/v1///".into();
        assert_eq!(config.chat_url(), "https://api.example.com/v1/chat");
        assert_eq!(config.health_url(), "https://api.example.com/v1/health");
    }

    #[test]
    fn test_env_value_blank_is_unset() {
        let mut config = Config::default();
        config.apply_env_value(Some("   "));
        assert_eq!(config.api_url, DEFAULT_API_URL);

        config.apply_env_value(None);
        assert_eq!(config.api_url, DEFAULT_API_URL);

        config.apply_env_value(Some(" http://10.0.0.5:9000/ "));
        assert_eq!(config.api_url, "http://10.0.0.5:9000/");
        assert_eq!(config.chat_url(), "http://10.0.0.5:9000/chat");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.api_url = "localhost:8000".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.api_url = "///".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.quick_prompts.push("  ".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"mode": "interview"}"#).unwrap();
        assert_eq!(config.mode, Some(AskMode::Interview));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.quick_prompts, Config::default().quick_prompts);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.api_url = "https://pq.example.com".into();
        config.top_k = Some(8);
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_resolve_explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            Config::resolve(Some(&missing), None),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_resolve_cli_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api_url": "http://file.example"}"#).unwrap();

        let config = Config::resolve(Some(&path), Some("http://cli.example/")).unwrap();
        assert_eq!(config.chat_url(), "http://cli.example/chat");
    }

    #[test]
    fn test_ask_mode_parse() {
        assert_eq!(AskMode::parse("Interview"), Some(AskMode::Interview));
        assert_eq!(AskMode::parse("chat"), Some(AskMode::Chat));
        assert_eq!(AskMode::parse("shout"), None);
    }
}
