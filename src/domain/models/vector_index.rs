//! Embedded chunk index for vector retrieval.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::chunking::Chunk;

/// A chunk together with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub chunk: Chunk,
    pub vector: Vec<f32>,
}

/// Embedded chunks of one course, valid for one content fingerprint and
/// embedding model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorIndex {
    pub course: String,
    pub fingerprint: String,
    pub model: String,
    pub built_at: DateTime<Utc>,
    pub entries: Vec<IndexedChunk>,
}

impl VectorIndex {
    pub fn new(course: &str, fingerprint: &str, model: &str, entries: Vec<IndexedChunk>) -> Self {
        Self {
            course: course.to_string(),
            fingerprint: fingerprint.to_string(),
            model: model.to_string(),
            built_at: Utc::now(),
            entries,
        }
    }

    /// Whether this index was built from the given content and model.
    pub fn is_current(&self, fingerprint: &str, model: &str) -> bool {
        self.fingerprint == fingerprint && self.model == model
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `k` entries most similar to `query`, best first. Equal scores keep
    /// index order.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(&IndexedChunk, f32)> {
        let mut scored: Vec<(&IndexedChunk, f32)> = self
            .entries
            .iter()
            .map(|entry| (entry, cosine_similarity(query, &entry.vector)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);
        scored
    }
}

/// Cosine similarity; `0.0` for mismatched lengths or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, vector: Vec<f32>) -> IndexedChunk {
        IndexedChunk {
            chunk: Chunk::new(label.to_string(), label.to_string(), 0),
            vector,
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_search_orders_by_similarity() {
        let index = VectorIndex::new(
            "ML",
            "abc",
            "model",
            vec![
                entry("far", vec![0.0, 1.0]),
                entry("near", vec![1.0, 0.1]),
                entry("exact", vec![1.0, 0.0]),
            ],
        );
        let hits = index.search(&[1.0, 0.0], 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0.chunk.parent_id, "exact");
        assert_eq!(hits[1].0.chunk.parent_id, "near");
    }

    #[test]
    fn test_is_current() {
        let index = VectorIndex::new("ML", "abc", "small", Vec::new());
        assert!(index.is_current("abc", "small"));
        assert!(!index.is_current("abd", "small"));
        assert!(!index.is_current("abc", "large"));
        assert!(index.is_empty());
    }
}
