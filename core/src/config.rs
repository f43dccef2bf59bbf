//! Client configuration loaded from `SENDGRID_*` environment variables.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::client::DEFAULT_BASE_URL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid or missing SENDGRID_* environment variable: {0}")]
    Env(#[from] envy::Error),

    #[error("SENDGRID_API_KEY is empty")]
    EmptyApiKey,
}

/// `SENDGRID_API_KEY` is required; `SENDGRID_BASE_URL` defaults to the public
/// API host.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl ClientConfig {
    /// Reads the process environment, after loading a `.env` file if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Self = envy::prefixed("SENDGRID_").from_iter(vars)?;
        if config.api_key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(config)
    }
}
