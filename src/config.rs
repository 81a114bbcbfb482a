use std::path::PathBuf;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::summarize::{DEFAULT_ENDPOINT, DEFAULT_MODEL, GeminiConfig, SUMMARY_PROMPT};

pub const DEFAULT_BIND: &str = "127.0.0.1:8501";
pub const DEFAULT_LANG: &str = "en";
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub bind: Option<String>,
    pub model: Option<String>,
    pub lang: Option<String>,
    pub api_key: Option<String>,
    pub gemini_endpoint: Option<String>,
    /// Instruction placed before the transcript
    pub prompt: Option<String>,
}

impl Config {
    /// Load config from ~/.config/ytbrief/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    /// Combine file values with the environment key and CLI overrides
    pub fn resolve(self, env_api_key: Option<String>, overrides: Overrides) -> Settings {
        Settings {
            bind: overrides.bind.or(self.bind).unwrap_or_else(|| DEFAULT_BIND.to_string()),
            lang: overrides.lang.or(self.lang).unwrap_or_else(|| DEFAULT_LANG.to_string()),
            prompt: self.prompt.unwrap_or_else(|| SUMMARY_PROMPT.to_string()),
            gemini: GeminiConfig {
                api_key: env_api_key.filter(|k| !k.is_empty()).or(self.api_key),
                model: overrides.model.or(self.model).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                endpoint: self.gemini_endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            },
        }
    }
}

/// Values given on the command line, which beat the config file
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub bind: Option<String>,
    pub model: Option<String>,
    pub lang: Option<String>,
}

/// Fully resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind: String,
    pub lang: String,
    pub prompt: String,
    pub gemini: GeminiConfig,
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytbrief")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
bind = "0.0.0.0:9000"
model = "gemini-1.5-flash"
lang = "es"
api_key = "from-file"
gemini_endpoint = "http://localhost:8080"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bind.as_deref(), Some("0.0.0.0:9000"));
        assert_eq!(config.model.as_deref(), Some("gemini-1.5-flash"));
        assert_eq!(config.lang.as_deref(), Some("es"));
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.gemini_endpoint.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.bind.is_none());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_resolve_defaults() {
        let settings = Config::default().resolve(None, Overrides::default());
        assert_eq!(settings.bind, DEFAULT_BIND);
        assert_eq!(settings.lang, "en");
        assert_eq!(settings.prompt, SUMMARY_PROMPT);
        assert_eq!(settings.gemini.model, "gemini-pro");
        assert_eq!(settings.gemini.endpoint, DEFAULT_ENDPOINT);
        assert!(settings.gemini.api_key.is_none());
    }

    #[test]
    fn test_resolve_priority() {
        let config: Config = toml::from_str(
            r#"
bind = "0.0.0.0:9000"
model = "file-model"
api_key = "from-file"
"#,
        )
        .unwrap();
        let overrides = Overrides {
            model: Some("cli-model".to_string()),
            ..Default::default()
        };
        let settings = config.resolve(Some("from-env".to_string()), overrides);
        assert_eq!(settings.bind, "0.0.0.0:9000");
        assert_eq!(settings.gemini.model, "cli-model");
        assert_eq!(settings.gemini.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_resolve_prompt_from_file() {
        let config: Config = toml::from_str(r#"prompt = "TL;DR:""#).unwrap();
        let settings = config.resolve(None, Overrides::default());
        assert_eq!(settings.prompt, "TL;DR:");
    }

    #[test]
    fn test_resolve_empty_env_key_falls_back_to_file() {
        let config = Config {
            api_key: Some("from-file".to_string()),
            ..Default::default()
        };
        let settings = config.resolve(Some(String::new()), Overrides::default());
        assert_eq!(settings.gemini.api_key.as_deref(), Some("from-file"));
    }
}
