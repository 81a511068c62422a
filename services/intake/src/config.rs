//! services/intake/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::fmt;
use std::path::PathBuf;
use symptom_guide_core::sanitize_credential;
use tracing::Level;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone)]
pub struct Config {
    pub log_level: Level,
    pub data_dir: PathBuf,
    /// Sanitised; `None` when absent or blank.
    pub api_key: Option<String>,
    pub api_base: String,
    pub guidance_model: String,
    pub include_reasoning: bool,
    pub prompt_template_path: Option<PathBuf>,
}

// The API key must never reach the logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("log_level", &self.log_level)
            .field("data_dir", &self.data_dir)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("guidance_model", &self.guidance_model)
            .field("include_reasoning", &self.include_reasoning)
            .field("prompt_template_path", &self.prompt_template_path)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to keep tests hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "WARN".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let data_dir = lookup("SYMPTOM_GUIDE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./.symptom-guide"));

        // --- Load the API key (optional; checked before each request) ---
        let raw_key = lookup("GEMINI_API_KEY").or_else(|| lookup("API_KEY"));
        let api_key = sanitize_credential(raw_key.as_deref());

        // --- Load guidance request settings ---
        let api_base =
            lookup("GUIDANCE_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let guidance_model =
            lookup("GUIDANCE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let include_reasoning = match lookup("GUIDANCE_INCLUDE_REASONING") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "GUIDANCE_INCLUDE_REASONING".to_string(),
                    format!("'{}' is not a boolean", raw),
                )
            })?,
            None => false,
        };

        let prompt_template_path = lookup("PROMPT_TEMPLATE_PATH").map(PathBuf::from);

        Ok(Self {
            log_level,
            data_dir,
            api_key,
            api_base,
            guidance_model,
            include_reasoning,
            prompt_template_path,
        })
    }

    /// Reads the prompt template override, if one is configured.
    pub fn load_prompt_template(&self) -> Result<Option<String>, ConfigError> {
        let Some(path) = &self.prompt_template_path else {
            return Ok(None);
        };
        std::fs::read_to_string(path).map(Some).map_err(|e| {
            ConfigError::InvalidValue(
                "PROMPT_TEMPLATE_PATH".to_string(),
                format!("cannot read {}: {}", path.display(), e),
            )
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.log_level, Level::WARN);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.guidance_model, DEFAULT_MODEL);
        assert!(config.api_key.is_none());
        assert!(!config.include_reasoning);
    }

    #[test]
    fn api_key_is_sanitised_and_falls_back() {
        let config = config_from(&[("API_KEY", " 'abc123' ")]).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc123"));

        let config = config_from(&[("GEMINI_API_KEY", "\"\""), ("API_KEY", "")]).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let config = config_from(&[("GEMINI_API_KEY", "secret-value")]).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-value"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config_from(&[("RUST_LOG", "chatty")]),
            Err(ConfigError::InvalidValue(var, _)) if var == "RUST_LOG"
        ));
        assert!(matches!(
            config_from(&[("GUIDANCE_INCLUDE_REASONING", "maybe")]),
            Err(ConfigError::InvalidValue(var, _)) if var == "GUIDANCE_INCLUDE_REASONING"
        ));
        let config = config_from(&[("GUIDANCE_INCLUDE_REASONING", "Yes")]).unwrap();
        assert!(config.include_reasoning);
    }
}
