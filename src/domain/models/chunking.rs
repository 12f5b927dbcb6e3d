//! Text chunking domain models
//!
//! Lesson material is split into overlapping chunks before it is embedded
//! for vector retrieval. Sizes are measured in characters.

use serde::{Deserialize, Serialize};

/// Configuration for splitting lesson text into chunks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChunkingConfig {
    /// Maximum size of each chunk in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Separators tried in order, coarsest first. An empty separator
    /// splits between characters.
    #[serde(default = "default_separators")]
    pub separators: Vec<String>,
}

const fn default_chunk_size() -> usize {
    1000
}

const fn default_chunk_overlap() -> usize {
    200
}

fn default_separators() -> Vec<String> {
    vec![
        "\n\n".to_string(),
        "\n".to_string(),
        " ".to_string(),
        String::new(),
    ]
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            separators: default_separators(),
        }
    }
}

impl ChunkingConfig {
    /// Configuration for large chunks, as used for long PDF material
    pub fn large() -> Self {
        Self {
            chunk_size: 10_000,
            chunk_overlap: 1000,
            separators: default_separators(),
        }
    }

    /// Validate the chunking configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err("chunk_overlap must be less than chunk_size".to_string());
        }

        if self.separators.is_empty() {
            return Err("separators cannot be empty".to_string());
        }

        Ok(())
    }
}

/// A chunk of text extracted from a lesson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier for this chunk
    pub id: String,

    /// Label of the parent lesson
    pub parent_id: String,

    /// The text content of this chunk
    pub content: String,

    /// Index of this chunk within the parent (0-based)
    pub chunk_index: usize,
}

impl Chunk {
    pub fn new(parent_id: String, content: String, chunk_index: usize) -> Self {
        let id = format!("{parent_id}:chunk:{chunk_index}");

        Self {
            id,
            parent_id,
            content,
            chunk_index,
        }
    }

    /// Length of the content in characters
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Get a preview of the content (first 100 chars)
    pub fn preview(&self) -> String {
        if self.char_len() <= 100 {
            self.content.clone()
        } else {
            let head: String = self.content.chars().take(100).collect();
            format!("{head}...")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ChunkingConfig::default();
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 200);
        assert!(config.validate().is_ok());
        assert!(ChunkingConfig::large().validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let config = ChunkingConfig {
            chunk_size: 100,
            chunk_overlap: 150,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ChunkingConfig {
            separators: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_chunk_id_and_preview() {
        let chunk = Chunk::new("Optics".to_string(), "é".repeat(150), 2);
        assert_eq!(chunk.id, "Optics:chunk:2");
        assert_eq!(chunk.preview().chars().count(), 103);
    }
}
