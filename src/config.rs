//! Runtime configuration loaded from an optional YAML file.
//!
//! Every field has a default, so an empty or missing file yields a working
//! configuration. Command-line flags and environment variables override the
//! file (see [`crate::cli::Cli`]).
//!
//! ```yaml
//! feeds:
//!   base_url: https://news.google.com
//! http:
//!   user_agent: "Mozilla/5.0 (compatible; RapidRecap/0.1)"
//!   timeout_secs: 20
//! summarizer:
//!   endpoint: https://api-inference.huggingface.co/models/Shrunoti09/T5_News
//!   api_token: hf_xxx
//!   timeout_secs: 120
//!   max_retries: 2
//! ```

use serde::Deserialize;
use std::time::Duration;
use tracing::{info, instrument};

use crate::error::{NewsError, Result};

pub const DEFAULT_FEED_BASE_URL: &str = "https://news.google.com";
pub const DEFAULT_MODEL_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/Shrunoti09/T5_News";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feeds: FeedConfig,
    pub http: HttpConfig,
    pub summarizer: SummarizerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Scheme and host the feed URL templates are rooted at.
    pub base_url: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FEED_BASE_URL.to_string(),
        }
    }
}

/// Settings for feed, article and image downloads.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("Mozilla/5.0 (compatible; RapidRecap/{})", env!("CARGO_PKG_VERSION")),
            timeout_secs: 20,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the client shared by the feed, article and image stages.
    pub fn client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout())
            .build()
            .map_err(|e| NewsError::Config(format!("cannot build HTTP client: {e}")))
    }
}

/// Where the summarization model lives and how to talk to it.
///
/// Decoding parameters are not configurable; see [`crate::summarizer`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub endpoint: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_MODEL_ENDPOINT.to_string(),
            api_token: None,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

impl AppConfig {
    /// Parse a YAML document. An empty document gives the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from `path`, or fall back to defaults when no path is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&str>) -> Result<Self> {
        let Some(path) = path else {
            info!("No config file given; using defaults");
            return Ok(Self::default());
        };
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| NewsError::Config(format!("cannot read {path}: {e}")))?;
        let config = Self::from_yaml(&yaml)?;
        info!(path, endpoint = %config.summarizer.endpoint, "Loaded configuration");
        Ok(config)
    }

    /// Apply command-line / environment overrides.
    pub fn with_overrides(mut self, endpoint: Option<String>, api_token: Option<String>) -> Self {
        if let Some(endpoint) = endpoint {
            self.summarizer.endpoint = endpoint;
        }
        if api_token.is_some() {
            self.summarizer.api_token = api_token;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = AppConfig::from_yaml("").unwrap();
        assert_eq!(config.feeds.base_url, DEFAULT_FEED_BASE_URL);
        assert_eq!(config.summarizer.endpoint, DEFAULT_MODEL_ENDPOINT);
        assert_eq!(config.summarizer.max_retries, 2);
        assert!(config.summarizer.api_token.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = r#"
summarizer:
  api_token: hf_secret
  max_retries: 0
http:
  timeout_secs: 5
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.summarizer.api_token.as_deref(), Some("hf_secret"));
        assert_eq!(config.summarizer.max_retries, 0);
        assert_eq!(config.summarizer.endpoint, DEFAULT_MODEL_ENDPOINT);
        assert_eq!(config.http.timeout(), Duration::from_secs(5));
        assert_eq!(config.feeds.base_url, DEFAULT_FEED_BASE_URL);
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let err = AppConfig::from_yaml("summarizer: [not, a, map]").unwrap_err();
        assert!(matches!(err, NewsError::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::default().with_overrides(
            Some("http://localhost:8080/generate".to_string()),
            None,
        );
        assert_eq!(config.summarizer.endpoint, "http://localhost:8080/generate");
        assert!(config.summarizer.api_token.is_none());

        let config = config.with_overrides(None, Some("tok".to_string()));
        assert_eq!(config.summarizer.endpoint, "http://localhost:8080/generate");
        assert_eq!(config.summarizer.api_token.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_load_without_path_is_default() {
        let config = AppConfig::load(None).await.unwrap();
        assert_eq!(config.http.timeout_secs, 20);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_config_error() {
        let err = AppConfig::load(Some("/nonexistent/rapid_recap.yaml")).await.unwrap_err();
        assert!(matches!(err, NewsError::Config(_)));
    }
}
