//! Service settings.
//!
//! Layered, lowest priority first:
//! 1. built-in defaults,
//! 2. a TOML file (`prompt-optimizer.toml`, or the path in `PROMPT_OPTIMIZER_CONFIG`) if it exists,
//! 3. `OPENAI_API_KEY` as the API key,
//! 4. `PROMPT_OPTIMIZER_*` environment variables, e.g. `PROMPT_OPTIMIZER_PORT=8080`.

use std::net::SocketAddr;
use std::time::Duration;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::generation::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::optimizer::GenerationSettings;

pub const ENV_PREFIX: &str = "PROMPT_OPTIMIZER_";
pub const CONFIG_PATH_ENV: &str = "PROMPT_OPTIMIZER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "prompt-optimizer.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(#[from] figment::Error),

    #[error("no API key configured, set PROMPT_OPTIMIZER_API_KEY or OPENAI_API_KEY")]
    MissingApiKey,

    #[error("invalid listen address {0}")]
    Address(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub max_tokens: u16,
    pub temperature: f32,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            api_key: None,
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo-instruct".to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// The layered figment, exposed so callers can merge extra providers.
    pub fn figment() -> Figment {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::raw().only(&["OPENAI_API_KEY"]).map(|_| "api_key".into()))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["CONFIG"]))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::figment().extract()?)
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::Address(addr))
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}
