use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Process-wide search configuration
///
/// Loaded once at startup and never mutated afterwards; the client holds it
/// behind an `Arc`. A missing API key is not a load error - it surfaces as a
/// request failure the first time a call is attempted.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Spoonacular API key
    #[serde(default)]
    pub api_key: String,
    /// Base URL of the recipe API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Results requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Attempts per list call (1 = no retry)
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Delay between retry attempts in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Quiet period before a typed query fires, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Fuzzy title filter threshold; larger values match more loosely
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
    /// Character budget for sanitized summary text
    #[serde(default = "default_summary_budget")]
    pub summary_budget: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            page_size: default_page_size(),
            timeout: default_timeout(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            debounce_ms: default_debounce_ms(),
            fuzzy_threshold: default_fuzzy_threshold(),
            summary_budget: default_summary_budget(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://api.spoonacular.com/recipes".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_timeout() -> u64 {
    30
}

fn default_retry_attempts() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    250
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_fuzzy_threshold() -> f64 {
    0.4
}

fn default_summary_budget() -> usize {
    200
}

impl ApiConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_SEARCH__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_SEARCH__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("RECIPE_SEARCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Configuration pointing at a local server, for tests
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_key: "test-key".to_string(),
            base_url: base_url.into(),
            retry_delay_ms: 0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "https://api.spoonacular.com/recipes");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.timeout, 30);
        assert_eq!(config.retry_attempts, 2);
        assert_eq!(config.debounce_ms, 500);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_fuzzy_threshold_is_permissive() {
        let config = ApiConfig::default();
        assert!(config.fuzzy_threshold > 0.0 && config.fuzzy_threshold < 1.0);
    }

    #[test]
    fn test_for_base_url() {
        let config = ApiConfig::for_base_url("http://127.0.0.1:1234");
        assert_eq!(config.base_url, "http://127.0.0.1:1234");
        assert!(!config.api_key.is_empty());
        assert_eq!(config.retry_delay_ms, 0);
    }
}
