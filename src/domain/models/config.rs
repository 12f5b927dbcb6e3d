use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::answer::RetrievalStrategy;
use super::chunking::ChunkingConfig;
use super::material::{default_resource_links, ResourceLink};

/// Main configuration structure for the teaching assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Directory holding course data, chat history, materials and logs
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Persistence configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Answer retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Chat completion endpoint configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Embedding endpoint configuration
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Resource center configuration
    #[serde(default)]
    pub resources: ResourcesConfig,
}

fn default_data_dir() -> String {
    ".teaching-assistant".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
            retrieval: RetrievalConfig::default(),
            llm: LlmConfig::default(),
            embeddings: EmbeddingsConfig::default(),
            rate_limit: RateLimitConfig::default(),
            retry: RetryConfig::default(),
            server: ServerConfig::default(),
            resources: ResourcesConfig::default(),
        }
    }
}

impl Config {
    /// Default configuration rooted at `data_dir`
    pub fn with_data_dir(data_dir: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// `courses.json` for the single-file layout, `courses/` otherwise
    pub fn courses_path(&self) -> PathBuf {
        match self.storage.layout {
            StorageLayout::SingleFile => self.data_path().join("courses.json"),
            StorageLayout::PerCourse => self.data_path().join("courses"),
        }
    }

    pub fn chat_history_path(&self) -> PathBuf {
        self.data_path().join("chat_history.json")
    }

    pub fn materials_dir(&self) -> PathBuf {
        self.data_path().join("learning_materials")
    }

    pub fn index_dir(&self) -> PathBuf {
        self.data_path().join("index")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_path().join("logs")
    }
}

/// How course data is laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageLayout {
    /// All courses in one JSON document
    SingleFile,
    /// One JSON document per course
    PerCourse,
}

impl fmt::Display for StorageLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageLayout::SingleFile => write!(f, "single_file"),
            StorageLayout::PerCourse => write!(f, "per_course"),
        }
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StorageConfig {
    #[serde(default = "default_layout")]
    pub layout: StorageLayout,

    /// Pretty-print JSON documents
    #[serde(default = "default_true")]
    pub pretty: bool,
}

const fn default_layout() -> StorageLayout {
    StorageLayout::SingleFile
}

const fn default_true() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            layout: default_layout(),
            pretty: default_true(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Also write JSON logs to `<data_dir>/logs`
    #[serde(default)]
    pub file: bool,

    /// Log file rotation: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: false,
            rotation: default_rotation(),
        }
    }
}

/// Answer retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetrievalConfig {
    /// Strategy used when a question does not name one
    #[serde(default = "default_strategy")]
    pub default_strategy: RetrievalStrategy,

    /// TF-IDF matches must score strictly above this value
    #[serde(default)]
    pub tfidf_threshold: f32,

    /// Number of chunks handed to the model as context
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Previous exchanges included in model prompts
    #[serde(default = "default_history_turns")]
    pub history_turns: usize,

    #[serde(default)]
    pub chunking: ChunkingConfig,
}

const fn default_strategy() -> RetrievalStrategy {
    RetrievalStrategy::TfIdf
}

const fn default_top_k() -> usize {
    5
}

const fn default_history_turns() -> usize {
    10
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_strategy: default_strategy(),
            tfidf_threshold: 0.0,
            top_k: default_top_k(),
            history_turns: default_history_turns(),
            chunking: ChunkingConfig::default(),
        }
    }
}

/// Chat completion endpoint configuration (OpenAI-compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LlmConfig {
    /// API key (can also be set via OPENAI_API_KEY env var)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL for the API (for proxies and local servers)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Temperature for answers grounded in retrieved context
    #[serde(default = "default_context_temperature")]
    pub context_temperature: f32,

    /// Temperature for direct completions
    #[serde(default = "default_completion_temperature")]
    pub completion_temperature: f32,

    /// Token cap for direct completions
    #[serde(default = "default_completion_max_tokens")]
    pub completion_max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4".to_string()
}

const fn default_context_temperature() -> f32 {
    0.7
}

const fn default_completion_temperature() -> f32 {
    0.5
}

const fn default_completion_max_tokens() -> u32 {
    100
}

const fn default_llm_timeout() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            context_temperature: default_context_temperature(),
            completion_temperature: default_completion_temperature(),
            completion_max_tokens: default_completion_max_tokens(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

/// Embedding endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingsConfig {
    /// Base URL; falls back to `llm.base_url` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Maximum texts per API request
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

const fn default_dimension() -> usize {
    1536
}

const fn default_max_batch_size() -> usize {
    2048
}

const fn default_embedding_timeout() -> u64 {
    30
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: default_embedding_model(),
            dimension: default_dimension(),
            max_batch_size: default_max_batch_size(),
            timeout_secs: default_embedding_timeout(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RateLimitConfig {
    /// Requests per minute allowed against hosted models
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

const fn default_requests_per_minute() -> u32 {
    60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    1000
}

const fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted upload in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8501
}

const fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Resource center configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResourcesConfig {
    #[serde(default = "default_resource_links")]
    pub links: Vec<ResourceLink>,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            links: default_resource_links(),
        }
    }
}
