//! Model client configuration, read from the environment (and `.env` via dotenv).

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Name of the environment variable holding the OpenRouter API key.
pub const API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "qwen/qwen3-32b";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PROVIDER_ONLY: &str = "Cerebras";
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";
pub const DEFAULT_APP_NAME: &str = "RecipeCompanion";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// The key itself is resolved at call time so a missing key surfaces as an API error.
    pub api_key_env_var: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout: Duration,
    /// OpenRouter upstream routing (`provider.only`); empty means no restriction.
    pub provider_only: Vec<String>,
    pub site_url: String,
    pub app_name: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key_env_var: API_KEY_ENV_VAR.to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            provider_only: split_list(DEFAULT_PROVIDER_ONLY),
            site_url: DEFAULT_SITE_URL.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }
}

impl ModelConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `LLM_MODEL`: model name (default: "qwen/qwen3-32b")
    /// - `RECIPE_COMPANION_BASE_URL`: API base URL
    /// - `RECIPE_COMPANION_TEMPERATURE`: sampling temperature (default: 0.1)
    /// - `RECIPE_COMPANION_TIMEOUT_SECS`: request timeout (default: 60)
    /// - `RECIPE_COMPANION_PROVIDER_ONLY`: comma separated upstream providers (default: "Cerebras")
    /// - `SITE_URL`, `APP_NAME`: attribution headers sent to OpenRouter
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let temperature = match lookup("RECIPE_COMPANION_TEMPERATURE") {
            Some(raw) => parse_value("RECIPE_COMPANION_TEMPERATURE", &raw)?,
            None => defaults.temperature,
        };
        let timeout = match lookup("RECIPE_COMPANION_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_value("RECIPE_COMPANION_TIMEOUT_SECS", &raw)?),
            None => defaults.timeout,
        };

        Ok(Self {
            api_key_env_var: defaults.api_key_env_var,
            model: lookup("LLM_MODEL").unwrap_or(defaults.model),
            base_url: lookup("RECIPE_COMPANION_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            temperature,
            timeout,
            provider_only: lookup("RECIPE_COMPANION_PROVIDER_ONLY")
                .map(|raw| split_list(&raw))
                .unwrap_or(defaults.provider_only),
            site_url: lookup("SITE_URL").unwrap_or(defaults.site_url),
            app_name: lookup("APP_NAME").unwrap_or(defaults.app_name),
        })
    }
}

fn parse_value<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value: raw.to_string(),
    })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = ModelConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ModelConfig::default());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.provider_only, vec!["Cerebras".to_string()]);
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = ModelConfig::from_lookup(lookup_from(&[
            ("LLM_MODEL", "openai/gpt-4o"),
            ("RECIPE_COMPANION_BASE_URL", "http://localhost:8080/v1/"),
            ("RECIPE_COMPANION_TEMPERATURE", "0.4"),
            ("RECIPE_COMPANION_TIMEOUT_SECS", "5"),
            ("RECIPE_COMPANION_PROVIDER_ONLY", "OpenAI, Azure ,"),
        ]))
        .unwrap();

        assert_eq!(config.model, "openai/gpt-4o");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert!((config.temperature - 0.4).abs() < f32::EPSILON);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.provider_only, vec!["OpenAI".to_string(), "Azure".to_string()]);
    }

    #[test]
    fn test_empty_provider_list_disables_routing() {
        let config =
            ModelConfig::from_lookup(lookup_from(&[("RECIPE_COMPANION_PROVIDER_ONLY", "")])).unwrap();
        assert!(config.provider_only.is_empty());
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let err = ModelConfig::from_lookup(lookup_from(&[("RECIPE_COMPANION_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "RECIPE_COMPANION_TIMEOUT_SECS".to_string(),
                value: "soon".to_string(),
            }
        );
    }
}
