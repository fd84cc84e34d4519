//! Configuration for the Fabula service
//!
//! Settings are layered: built-in defaults, then an optional `fabula.toml`
//! file, then environment variables prefixed with `FABULA_` (nested keys
//! separated by `__`, e.g. `FABULA_SERVER__ADDR`). The completion-provider
//! API key is read from the `ANTHROPIC_API_KEY` environment variable only,
//! never from a config file.

use crate::error::Result;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;
use tracing::debug;

/// Default config file name, looked up in the working directory
const CONFIG_FILE: &str = "fabula";

/// Top-level service configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FabulaConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub story: StoryConfig,
    pub scheduler: SchedulerConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:5000".to_string(),
        }
    }
}

/// Feedback store settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the libSQL database file (`:memory:` for an in-memory store)
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "fabula.db".to_string(),
        }
    }
}

/// Completion-provider settings for story generation
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    /// Model to use for completions
    pub model: String,
    /// Max tokens per generated story
    pub max_tokens: usize,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-5-haiku-20241022".to_string(),
            max_tokens: 1024,
            temperature: 0.7,
        }
    }
}

/// Scheduled batch runner settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Whether the daily feedback-processing pass runs at all
    pub enabled: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl FabulaConfig {
    /// Load configuration from defaults, optional `fabula.toml`, and
    /// `FABULA_*` environment variables (highest precedence).
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load with an explicit config file base name (no extension)
    pub fn load_from(file: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix("FABULA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: FabulaConfig = settings.try_deserialize()?;
        debug!(
            "Configuration loaded: addr={}, db={}",
            config.server.addr, config.database.path
        );
        Ok(config)
    }

    /// Completion-provider API key from the environment, if set
    pub fn api_key() -> Option<String> {
        env::var("ANTHROPIC_API_KEY").ok().filter(|k| !k.is_empty())
    }
}
