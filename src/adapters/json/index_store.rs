//! On-disk cache of embedded course indexes.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use super::file_io::{read_json_optional, remove_if_exists, write_json_atomic};
use crate::domain::errors::DomainResult;
use crate::domain::models::{content_hash, VectorIndex};
use crate::domain::ports::VectorIndexStore;

/// One JSON file per course under `index/`
///
/// Files are named by a digest of the course name so any valid name maps
/// to a safe filename.
pub struct JsonIndexStore {
    dir: PathBuf,
}

impl JsonIndexStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, course: &str) -> PathBuf {
        let digest = content_hash(course.as_bytes());
        self.dir.join(format!("{}.json", &digest[..16]))
    }
}

#[async_trait]
impl VectorIndexStore for JsonIndexStore {
    async fn load(&self, course: &str) -> DomainResult<Option<VectorIndex>> {
        let index: Option<VectorIndex> = read_json_optional(&self.path_for(course)).await?;
        // Guard against digest prefix collisions.
        Ok(index.filter(|i| i.course == course))
    }

    async fn save(&self, index: &VectorIndex) -> DomainResult<()> {
        let path = self.path_for(&index.course);
        debug!(course = %index.course, chunks = index.len(), path = %path.display(), "saving vector index");
        write_json_atomic(&path, index, false).await
    }

    async fn remove(&self, course: &str) -> DomainResult<bool> {
        remove_if_exists(&self.path_for(course)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Chunk, IndexedChunk};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_load_remove() {
        let dir = TempDir::new().unwrap();
        let store = JsonIndexStore::new(dir.path().join("index"));

        assert!(store.load("Optics").await.unwrap().is_none());

        let index = VectorIndex::new(
            "Optics",
            "fp",
            "text-embedding-3-small",
            vec![IndexedChunk {
                chunk: Chunk::new("Lenses".to_string(), "Lenses bend light.".to_string(), 0),
                vector: vec![0.25, 0.5],
            }],
        );
        store.save(&index).await.unwrap();

        let loaded = store.load("Optics").await.unwrap().unwrap();
        assert_eq!(loaded, index);
        assert!(store.load("Acoustics").await.unwrap().is_none());

        assert!(store.remove("Optics").await.unwrap());
        assert!(!store.remove("Optics").await.unwrap());
    }
}
