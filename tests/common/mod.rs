//! Common test utilities for integration tests

use tempfile::TempDir;

use teaching_assistant::{AppContext, Config};

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Default configuration rooted in `dir`
pub fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::with_data_dir(dir.path().display().to_string());
    config.retry.initial_backoff_ms = 1;
    config.retry.max_backoff_ms = 5;
    config
}

/// Configuration whose hosted model calls go to `base_url`
#[allow(dead_code)]
pub fn openai_config(dir: &TempDir, base_url: &str) -> Config {
    let mut config = test_config(dir);
    config.llm.base_url = base_url.to_string();
    config.llm.api_key = Some("test-key".to_string());
    config
}

/// Services over a fresh data directory
#[allow(dead_code)]
pub fn context(dir: &TempDir) -> AppContext {
    AppContext::from_config(test_config(dir)).expect("Failed to build context")
}

/// Setup test logging
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
