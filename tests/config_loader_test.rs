use std::fs;
use tempfile::TempDir;

use teaching_assistant::domain::models::StorageLayout;
use teaching_assistant::{ConfigLoader, RetrievalStrategy};

fn write_config(dir: &TempDir, yaml: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.yaml");
    fs::write(&path, yaml).unwrap();
    path
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r"
data_dir: /srv/assistant
storage:
  layout: per_course
retrieval:
  default_strategy: keyword
  top_k: 3
",
    );

    temp_env::with_vars_unset(
        [
            "TEACHING_ASSISTANT_DATA_DIR",
            "TEACHING_ASSISTANT_RETRIEVAL__TOP_K",
        ],
        || {
            let config = ConfigLoader::load_from_file(&path).unwrap();
            assert_eq!(config.data_dir, "/srv/assistant");
            assert_eq!(config.storage.layout, StorageLayout::PerCourse);
            assert_eq!(config.retrieval.default_strategy, RetrievalStrategy::Keyword);
            assert_eq!(config.retrieval.top_k, 3);
            // Unset sections keep their defaults
            assert_eq!(config.llm.completion_max_tokens, 100);
            assert_eq!(config.server.port, 8501);
        },
    );
}

#[test]
fn test_env_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "retrieval:\n  top_k: 3\n");

    temp_env::with_vars(
        [
            ("TEACHING_ASSISTANT_RETRIEVAL__TOP_K", Some("8")),
            ("TEACHING_ASSISTANT_RETRIEVAL__DEFAULT_STRATEGY", Some("vector")),
            ("TEACHING_ASSISTANT_LOGGING__LEVEL", Some("debug")),
        ],
        || {
            let config = ConfigLoader::load_from_file(&path).unwrap();
            assert_eq!(config.retrieval.top_k, 8);
            assert_eq!(config.retrieval.default_strategy, RetrievalStrategy::Vector);
            assert_eq!(config.logging.level, "debug");
        },
    );
}

#[test]
fn test_invalid_values_fail_validation() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "retrieval:\n  tfidf_threshold: 1.5\n");

    temp_env::with_var_unset("TEACHING_ASSISTANT_RETRIEVAL__TFIDF_THRESHOLD", || {
        let err = ConfigLoader::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("tfidf_threshold"));
    });
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = ConfigLoader::load_from_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
}

#[test]
fn test_malformed_yaml_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "retrieval: [unterminated\n");
    assert!(ConfigLoader::load_from_file(&path).is_err());
}
