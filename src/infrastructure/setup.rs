//! Project initialization infrastructure
//!
//! Handles `init`:
//! - Configuration directory creation
//! - Default config file creation
//! - Data directory layout

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::models::{Config, StorageLayout};
use crate::infrastructure::config::PROJECT_DIR;

/// Default configuration template content
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Teaching Assistant Configuration
# Override settings by editing this file, adding local.yaml next to it, or
# setting environment variables with the TEACHING_ASSISTANT_ prefix
#
# Example environment variables:
#   export TEACHING_ASSISTANT_RETRIEVAL__DEFAULT_STRATEGY=vector
#   export TEACHING_ASSISTANT_STORAGE__LAYOUT=per_course
#   export TEACHING_ASSISTANT_LOGGING__LEVEL=debug

# Where courses, chat history, uploads and logs are kept
data_dir: ".teaching-assistant"

storage:
  # single_file: one courses.json; per_course: courses/<name>.json
  layout: "single_file"
  pretty: true

logging:
  # Log level: trace, debug, info, warn, error
  level: "warn"
  # Log format: json, pretty
  format: "pretty"
  # Also write JSON logs to <data_dir>/logs
  file: false
  # daily, hourly, never
  rotation: "daily"

retrieval:
  # keyword, phrase, tfidf, vector, llm
  default_strategy: "tfidf"
  # TF-IDF answers must score strictly above this
  tfidf_threshold: 0.0
  # Chunks handed to the model by the vector strategy
  top_k: 5
  # Previous exchanges included in prompts
  history_turns: 10
  chunking:
    chunk_size: 1000
    chunk_overlap: 200

# OpenAI-compatible chat completions; the API key is read from
# OPENAI_API_KEY when not set here
llm:
  base_url: "https://api.openai.com/v1"
  model: "gpt-4"
  context_temperature: 0.7
  completion_temperature: 0.5
  completion_max_tokens: 100

embeddings:
  model: "text-embedding-3-small"

rate_limit:
  requests_per_minute: 60

# Retry policy for transient API failures
retry:
  max_retries: 3
  initial_backoff_ms: 1000
  max_backoff_ms: 30000

server:
  host: "127.0.0.1"
  port: 8501
"#;

/// Setup paths and directories
#[derive(Debug, Clone)]
pub struct SetupPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
}

impl SetupPaths {
    /// Setup paths below `root`
    pub fn new(root: &Path) -> Self {
        let config_dir = root.join(PROJECT_DIR);
        Self {
            config_file: config_dir.join("config.yaml"),
            config_dir,
        }
    }

    /// Check if the project is already initialized
    pub fn is_initialized(&self) -> bool {
        self.config_file.exists()
    }
}

/// Create the configuration directory
pub fn create_config_dir(paths: &SetupPaths) -> Result<()> {
    fs::create_dir_all(&paths.config_dir).context("Failed to create config directory")?;
    Ok(())
}

/// Create the default configuration file. Returns whether it was written.
pub fn create_config_file(paths: &SetupPaths, force: bool) -> Result<bool> {
    if paths.config_file.exists() && !force {
        return Ok(false);
    }

    fs::write(&paths.config_file, DEFAULT_CONFIG_TEMPLATE).context("Failed to write config file")?;
    Ok(true)
}

/// Create the data directories named by `config`, relative to `root` when
/// the configured data directory is relative. Returns the directories that
/// did not exist before.
pub fn create_data_dirs(root: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    let mut dirs = vec![config.materials_dir(), config.index_dir(), config.logs_dir()];
    if config.storage.layout == StorageLayout::PerCourse {
        dirs.push(config.courses_path());
    }

    let mut created = Vec::new();
    for dir in dirs {
        let dir = if dir.is_absolute() { dir } else { root.join(dir) };
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
            created.push(dir);
        }
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_template_parses_as_valid_config() {
        let config: Config = serde_yaml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        crate::infrastructure::config::ConfigLoader::validate(&config).unwrap();
        assert_eq!(config.server.port, 8501);
    }

    #[test]
    fn test_create_config_respects_force() {
        let dir = TempDir::new().unwrap();
        let paths = SetupPaths::new(dir.path());
        assert!(!paths.is_initialized());

        create_config_dir(&paths).unwrap();
        assert!(create_config_file(&paths, false).unwrap());
        assert!(paths.is_initialized());

        fs::write(&paths.config_file, "data_dir: elsewhere\n").unwrap();
        assert!(!create_config_file(&paths, false).unwrap());
        assert_eq!(fs::read_to_string(&paths.config_file).unwrap(), "data_dir: elsewhere\n");
        assert!(create_config_file(&paths, true).unwrap());
    }

    #[test]
    fn test_create_data_dirs() {
        let dir = TempDir::new().unwrap();
        let config = Config::default();
        let created = create_data_dirs(dir.path(), &config).unwrap();
        assert_eq!(created.len(), 3);
        assert!(dir.path().join(".teaching-assistant/learning_materials").is_dir());
        assert!(create_data_dirs(dir.path(), &config).unwrap().is_empty());
    }
}
