use serde::Deserialize;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Prefix for every environment variable read by [`Config::from_env`]
pub const ENV_PREFIX: &str = "CINESEARCH_";

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB v3 API key
    pub api_key: String,

    /// TMDB API root, without trailing slash
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Prefix prepended to relative poster/backdrop paths
    #[serde(default = "default_image_prefix")]
    pub image_prefix: String,

    /// Response language (ISO 639-1 with optional region, e.g. `en-US`)
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub include_adult: bool,

    /// ISO 3166-1 code used to filter release dates
    #[serde(default)]
    pub region: Option<String>,

    /// How long boundary notices stay on screen
    #[serde(default = "default_notice_duration_ms")]
    pub notice_duration_ms: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_prefix() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_notice_duration_ms() -> u64 {
    2000
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::prefixed(ENV_PREFIX)
            .from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit set of key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::prefixed(ENV_PREFIX)
            .from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::Config(format!("{}API_KEY cannot be empty", ENV_PREFIX)));
        }
        if self.api_url.trim().is_empty() {
            return Err(AppError::Config(format!("{}API_URL cannot be empty", ENV_PREFIX)));
        }
        Ok(())
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// API root with any trailing slash removed
    pub fn api_root(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}
