//! Vector retrieval infrastructure: text chunking for embedding.

pub mod chunker;

pub use chunker::Chunker;
