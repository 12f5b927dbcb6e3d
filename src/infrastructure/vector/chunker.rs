//! Recursive character text splitter
//!
//! Splits lesson text on the coarsest separator present (paragraphs, then
//! lines, then words, then characters) and merges the pieces back into
//! chunks of at most `chunk_size` characters, carrying up to
//! `chunk_overlap` characters from the end of one chunk into the next.

use std::collections::VecDeque;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Chunk, ChunkingConfig};

/// Character-based recursive text chunker
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    /// Create a chunker with custom configuration
    pub fn with_config(config: ChunkingConfig) -> DomainResult<Self> {
        config
            .validate()
            .map_err(|e| DomainError::ValidationFailed(format!("Invalid chunking config: {e}")))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Split `text` into chunks labelled with `parent_id`
    pub fn chunk(&self, text: &str, parent_id: &str) -> Vec<Chunk> {
        self.split_text(text)
            .into_iter()
            .enumerate()
            .map(|(i, content)| Chunk::new(parent_id.to_string(), content, i))
            .collect()
    }

    /// Split `text` into chunk strings
    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        self.split_recursive(text, &self.config.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        // Pick the first separator present in the text; the empty separator
        // always matches.
        let mut separator = separators.last().map_or("", String::as_str);
        let mut remaining: &[String] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() {
                separator = "";
                break;
            }
            if text.contains(sep.as_str()) {
                separator = sep;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let splits: Vec<&str> = if separator.is_empty() {
            text.char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect()
        } else {
            text.split(separator).filter(|s| !s.is_empty()).collect()
        };

        let mut chunks = Vec::new();
        let mut pending: Vec<&str> = Vec::new();
        for split in splits {
            if char_len(split) < self.config.chunk_size {
                pending.push(split);
                continue;
            }
            if !pending.is_empty() {
                chunks.extend(self.merge_splits(&pending, separator));
                pending.clear();
            }
            if remaining.is_empty() {
                chunks.push(split.trim().to_string());
            } else {
                chunks.extend(self.split_recursive(split, remaining));
            }
        }
        if !pending.is_empty() {
            chunks.extend(self.merge_splits(&pending, separator));
        }

        chunks.retain(|c| !c.is_empty());
        chunks
    }

    fn merge_splits(&self, splits: &[&str], separator: &str) -> Vec<String> {
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;
        let sep_len = char_len(separator);

        let mut docs = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &split in splits {
            let len = char_len(split);
            let joiner = if current.is_empty() { 0 } else { sep_len };

            if total + len + joiner > size && !current.is_empty() {
                push_joined(&mut docs, &current, separator);

                // Drop pieces from the front until the carried-over tail fits
                // the overlap budget and leaves room for the next piece.
                while total > overlap
                    || (total > 0 && total + len + if current.is_empty() { 0 } else { sep_len } > size)
                {
                    let Some(front) = current.pop_front() else {
                        break;
                    };
                    total -= char_len(front) + if current.is_empty() { 0 } else { sep_len };
                }
            }

            let joiner = if current.is_empty() { 0 } else { sep_len };
            current.push_back(split);
            total += len + joiner;
        }

        push_joined(&mut docs, &current, separator);
        docs
    }
}

fn push_joined(docs: &mut Vec<String>, parts: &VecDeque<&str>, separator: &str) {
    let joined = parts.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        docs.push(trimmed.to_string());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(size: usize, overlap: usize) -> Chunker {
        Chunker::with_config(ChunkingConfig {
            chunk_size: size,
            chunk_overlap: overlap,
            ..ChunkingConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_invalid_config() {
        let config = ChunkingConfig {
            chunk_size: 100,
            chunk_overlap: 150,
            ..ChunkingConfig::default()
        };
        assert!(Chunker::with_config(config).is_err());
    }

    #[test]
    fn test_empty_text() {
        let chunker = chunker(100, 10);
        assert!(chunker.chunk("", "doc").is_empty());
        assert!(chunker.chunk("  \n\n ", "doc").is_empty());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = chunker(1000, 200).chunk("Gradient descent minimises loss.", "ML");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Gradient descent minimises loss.");
        assert_eq!(chunks[0].id, "ML:chunk:0");
    }

    #[test]
    fn test_paragraphs_split_first() {
        let text = "first paragraph here\n\nsecond paragraph here";
        let chunks = chunker(25, 0).split_text(text);
        assert_eq!(chunks, vec!["first paragraph here", "second paragraph here"]);
    }

    #[test]
    fn test_words_with_overlap() {
        let text = "one two three four five six seven eight nine ten";
        let chunks = chunker(15, 5).split_text(text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 15, "chunk too long: {chunk:?}");
        }
        // Consecutive chunks share a word.
        let first_last = chunks[0].split(' ').last().unwrap();
        assert!(chunks[1].starts_with(first_last));
    }

    #[test]
    fn test_long_word_falls_back_to_characters() {
        let text = "x".repeat(25);
        let chunks = chunker(10, 0).split_text(&text);
        assert_eq!(chunks, vec!["x".repeat(10), "x".repeat(10), "x".repeat(5)]);
    }

    #[test]
    fn test_multibyte_characters() {
        let text = "é".repeat(12);
        let chunks = chunker(5, 1).split_text(&text);
        assert!(chunks.iter().all(|c| c.chars().count() <= 5));
        assert!(chunks.len() >= 3);
    }
}
