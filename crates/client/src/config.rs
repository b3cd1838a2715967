//! Environment-driven client configuration.

/// Environment variable naming the CRM API base URL.
pub const ENV_BASE_URL: &str = "LEADLINE_API_BASE_URL";

/// Environment variable naming the optional API key.
pub const ENV_API_KEY: &str = "LEADLINE_API_KEY";

/// Connection settings for one CRM backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base HTTP URL, e.g. `https://crm.example.com` (no trailing slash).
    pub base_url: String,
    /// Bearer token attached to every request when present.
    pub api_key: Option<String>,
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is absent.
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Load configuration from the environment, reading `.env` first
    /// when one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let base_url =
            std::env::var(ENV_BASE_URL).map_err(|_| ConfigError::MissingVar(ENV_BASE_URL))?;
        let mut config = Self::new(base_url);
        config.api_key = std::env::var(ENV_API_KEY).ok();
        Ok(config)
    }
}
