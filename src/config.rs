//! Runtime settings: defaults, an optional YAML file, then CLI overrides.
//!
//! ```yaml
//! news_endpoint: https://newsdata.io/api/1/latest
//! news_api_key: pub_xxx
//! speech_api_key: AIza...
//! slots: 12
//! request_timeout_secs: 15
//! base_query: India
//! ```
//!
//! Every key is optional.

use crate::api::DEFAULT_NEWS_ENDPOINT;
use crate::cli::Cli;
use crate::errors::ConfigError;
use crate::render::DEFAULT_SLOT_CAPACITY;
use crate::session::DEFAULT_BASE_QUERY;
use crate::speech::DEFAULT_SPEECH_ENDPOINT;
use serde::Deserialize;
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub news_endpoint: String,
    pub news_api_key: Option<String>,
    pub speech_endpoint: String,
    pub speech_api_key: Option<String>,
    /// Number of display slots.
    pub slots: usize,
    pub request_timeout_secs: u64,
    /// Topic for the landing page and language switches.
    pub base_query: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            news_endpoint: DEFAULT_NEWS_ENDPOINT.to_string(),
            news_api_key: None,
            speech_endpoint: DEFAULT_SPEECH_ENDPOINT.to_string(),
            speech_api_key: None,
            slots: DEFAULT_SLOT_CAPACITY,
            request_timeout_secs: 15,
            base_query: DEFAULT_BASE_QUERY.to_string(),
        }
    }
}

impl Settings {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    #[instrument(level = "info")]
    pub async fn load(path: &str) -> Result<Self, ConfigError> {
        let yaml = fs::read_to_string(path).await?;
        let settings = Self::from_yaml_str(&yaml)?;
        info!(path, "Loaded settings file");
        Ok(settings)
    }

    /// Resolve settings for this run: file (if any), then flags and env vars.
    pub async fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut settings = match &cli.config {
            Some(path) => Self::load(path).await?,
            None => Self::default(),
        };
        settings.apply_cli(cli);
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(key) = &cli.news_api_key {
            self.news_api_key = Some(key.clone());
        }
        if let Some(key) = &cli.speech_api_key {
            self.speech_api_key = Some(key.clone());
        }
        if let Some(endpoint) = &cli.news_endpoint {
            self.news_endpoint = endpoint.clone();
        }
        if let Some(endpoint) = &cli.speech_endpoint {
            self.speech_endpoint = endpoint.clone();
        }
        if let Some(slots) = cli.slots {
            self.slots = slots;
        }
        if let Some(base_query) = &cli.base_query {
            self.base_query = base_query.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for endpoint in [&self.news_endpoint, &self.speech_endpoint] {
            Url::parse(endpoint).map_err(|source| ConfigError::InvalidUrl {
                url: endpoint.clone(),
                source,
            })?;
        }
        if self.slots == 0 {
            return Err(ConfigError::InvalidSlots);
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.slots, DEFAULT_SLOT_CAPACITY);
        assert_eq!(settings.base_query, "India");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let settings = Settings::from_yaml_str("slots: 6\nnews_api_key: abc\n").unwrap();
        assert_eq!(settings.slots, 6);
        assert_eq!(settings.news_api_key.as_deref(), Some("abc"));
        assert_eq!(settings.news_endpoint, DEFAULT_NEWS_ENDPOINT);
        assert_eq!(Settings::from_yaml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn test_bad_yaml_is_an_error() {
        assert!(matches!(Settings::from_yaml_str("slots: [oops"), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let settings = Settings {
            slots: 0,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::InvalidSlots)));

        let settings = Settings {
            news_endpoint: "not a url".into(),
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let settings = Settings::from_yaml_str("request_timeout_secs: 0
").unwrap();
        assert!(matches!(settings.validate(), Err(ConfigError::InvalidTimeout)));
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut settings = Settings::from_yaml_str("slots: 6\nbase_query: Mumbai\n").unwrap();
        let cli = Cli::parse_from(["newsdeck", "--slots", "3", "--news-api-key", "from-cli"]);
        settings.apply_cli(&cli);
        assert_eq!(settings.slots, 3);
        assert_eq!(settings.base_query, "Mumbai");
        assert_eq!(settings.news_api_key.as_deref(), Some("from-cli"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        assert!(matches!(Settings::load("/nonexistent/newsdeck.yaml").await, Err(ConfigError::Io(_))));
    }
}
