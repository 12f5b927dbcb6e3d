use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::infrastructure::logging::{LogFormat, RotationPolicy};

/// Directory holding project configuration and data
pub const PROJECT_DIR: &str = ".teaching-assistant";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "TEACHING_ASSISTANT_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error("Data directory cannot be empty")]
    EmptyDataDir,

    #[error("Invalid tfidf_threshold: {0}. Must be in [0, 1)")]
    InvalidThreshold(f32),

    #[error("Invalid top_k: {0}. Must be at least 1")]
    InvalidTopK(usize),

    #[error("Invalid chunking configuration: {0}")]
    InvalidChunking(String),

    #[error("Invalid rate limit: {0}. Must be positive")]
    InvalidRateLimit(u32),

    #[error("Invalid max_retries: {0}. Cannot be 0")]
    InvalidMaxRetries(u32),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .teaching-assistant/config.yaml (project config, created by init)
    /// 3. .teaching-assistant/local.yaml (project local overrides, optional)
    /// 4. Environment variables (TEACHING_ASSISTANT_* prefix, `__` nests)
    pub fn load() -> Result<Config> {
        let project = Path::new(PROJECT_DIR);
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(project.join("config.yaml")))
            .merge(Yaml::file(project.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file instead of the project files
    ///
    /// Environment variables still take precedence over the file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }
        if config.logging.format.parse::<LogFormat>().is_err() {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }
        if config.logging.rotation.parse::<RotationPolicy>().is_err() {
            return Err(ConfigError::InvalidLogRotation(config.logging.rotation.clone()));
        }

        if config.data_dir.trim().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }

        let threshold = config.retrieval.tfidf_threshold;
        if !(0.0..1.0).contains(&threshold) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        if config.retrieval.top_k == 0 {
            return Err(ConfigError::InvalidTopK(config.retrieval.top_k));
        }
        config
            .retrieval
            .chunking
            .validate()
            .map_err(ConfigError::InvalidChunking)?;

        if config.rate_limit.requests_per_minute == 0 {
            return Err(ConfigError::InvalidRateLimit(config.rate_limit.requests_per_minute));
        }

        if config.retry.max_retries == 0 {
            return Err(ConfigError::InvalidMaxRetries(config.retry.max_retries));
        }
        if config.retry.initial_backoff_ms >= config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        if config.llm.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("llm.base_url cannot be empty".to_string()));
        }
        if config.embeddings.max_batch_size == 0 {
            return Err(ConfigError::ValidationFailed(
                "embeddings.max_batch_size must be at least 1".to_string(),
            ));
        }
        if config.server.max_upload_bytes == 0 {
            return Err(ConfigError::ValidationFailed(
                "server.max_upload_bytes must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
